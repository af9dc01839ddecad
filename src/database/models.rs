use chrono::NaiveDateTime;

/// A registered tournament entrant, as stored
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentPlayer {
    pub id: i64,
    pub tournament_id: Option<i64>,
    pub name: String,
    pub uscf_id: String,
    pub rating: Option<i64>,
    pub section: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub status: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}
