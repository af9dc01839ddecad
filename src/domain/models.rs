use serde::{Deserialize, Serialize};

/// Placeholder stored in a profile when the rating node never appears
pub const RATING_NOT_FOUND: &str = "Not found";

/// Rating pools published by the ratings site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingCategory {
    Regular,
    Quick,
    Blitz,
    OnlineRegular,
    OnlineQuick,
    OnlineBlitz,
}

impl RatingCategory {
    /// Map the one/two-letter badge code shown on search cards
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "R" => Some(RatingCategory::Regular),
            "Q" => Some(RatingCategory::Quick),
            "B" => Some(RatingCategory::Blitz),
            "OR" => Some(RatingCategory::OnlineRegular),
            "OQ" => Some(RatingCategory::OnlineQuick),
            "OB" => Some(RatingCategory::OnlineBlitz),
            _ => None,
        }
    }
}

/// One optional value per rating category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    pub regular: Option<u32>,
    pub quick: Option<u32>,
    pub blitz: Option<u32>,
    pub online_regular: Option<u32>,
    pub online_quick: Option<u32>,
    pub online_blitz: Option<u32>,
}

impl Ratings {
    pub fn get(&self, category: RatingCategory) -> Option<u32> {
        match category {
            RatingCategory::Regular => self.regular,
            RatingCategory::Quick => self.quick,
            RatingCategory::Blitz => self.blitz,
            RatingCategory::OnlineRegular => self.online_regular,
            RatingCategory::OnlineQuick => self.online_quick,
            RatingCategory::OnlineBlitz => self.online_blitz,
        }
    }

    pub fn set(&mut self, category: RatingCategory, value: Option<u32>) {
        let slot = match category {
            RatingCategory::Regular => &mut self.regular,
            RatingCategory::Quick => &mut self.quick,
            RatingCategory::Blitz => &mut self.blitz,
            RatingCategory::OnlineRegular => &mut self.online_regular,
            RatingCategory::OnlineQuick => &mut self.online_quick,
            RatingCategory::OnlineBlitz => &mut self.online_blitz,
        };
        *slot = value;
    }

    /// First present value among regular, quick and blitz
    pub fn primary(&self) -> Option<u32> {
        [RatingCategory::Regular, RatingCategory::Quick, RatingCategory::Blitz]
            .into_iter()
            .find_map(|category| self.get(category))
    }
}

/// A player as read from a single search result card
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub name: String,
    pub member_id: String,
    pub ratings: Ratings,
    pub state: Option<String>,
    pub expiration_date: Option<String>,
}

/// JSON shape written by the search tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPlayer {
    pub name: String,
    #[serde(rename = "memberId")]
    pub member_id: String,
    pub state: Option<String>,
    pub ratings: Ratings,
    pub uscf_id: String,
    pub rating: Option<u32>,
    pub expiration_date: Option<String>,
}

impl From<PlayerRecord> for SearchPlayer {
    fn from(record: PlayerRecord) -> Self {
        let rating = record.ratings.primary();
        Self {
            name: record.name,
            uscf_id: record.member_id.clone(),
            member_id: record.member_id,
            state: record.state,
            ratings: record.ratings,
            rating,
            expiration_date: record.expiration_date,
        }
    }
}

/// Result of a profile lookup for one member id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub rating: String,
    pub expiration_date: Option<String>,
    pub player_id: String,
}

impl ProfileInfo {
    pub fn new(player_id: &str, rating: Option<String>, expiration_date: Option<String>) -> Self {
        Self {
            rating: rating
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| RATING_NOT_FOUND.to_string()),
            expiration_date: expiration_date.filter(|d| !d.trim().is_empty()),
            player_id: player_id.to_string(),
        }
    }

    pub fn has_rating(&self) -> bool {
        self.rating != RATING_NOT_FOUND
    }

    /// Neither field could be read
    pub fn is_empty(&self) -> bool {
        !self.has_rating() && self.expiration_date.is_none()
    }
}
