use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use super::models::TournamentPlayer;

const PLAYER_COLUMNS: &str = "id, tournament_id, name, uscf_id, rating, section, status";

/// Every player with a non-empty member id
pub fn list_with_member_ids(conn: &mut DbConn) -> Result<Vec<TournamentPlayer>> {
    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE uscf_id IS NOT NULL AND uscf_id != '' ORDER BY id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list players with member ids")?;

    Ok(rows)
}

/// Players of one tournament that have a member id, by name
pub fn list_by_tournament(conn: &mut DbConn, tournament_id: i64) -> Result<Vec<TournamentPlayer>> {
    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players \
         WHERE tournament_id = ?1 AND uscf_id IS NOT NULL AND uscf_id != '' \
         ORDER BY name"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list players of tournament {}", tournament_id))?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<TournamentPlayer> {
    Ok(TournamentPlayer {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        name: row.get(2)?,
        uscf_id: row.get(3)?,
        rating: row.get(4)?,
        section: row.get(5)?,
        status: row.get(6)?,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn insert_player(conn: &mut DbConn, tournament_id: Option<i64>, name: &str, uscf_id: Option<&str>) -> i64 {
        conn.execute(
            "INSERT INTO players (tournament_id, name, uscf_id, section, status) VALUES (?1, ?2, ?3, 'Open', 'active')",
            params![tournament_id, name, uscf_id],
        )
        .unwrap();
        conn.last_insert_rowid()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::insert_player;
    use super::*;
    use crate::database::setup::ensure_schema;
    use crate::database::{create_memory_pool, get_connection};

    #[test]
    fn test_member_id_filter() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        let with_id = insert_player(&mut conn, None, "Zed", Some("14970943"));
        insert_player(&mut conn, None, "Blank", Some(""));
        insert_player(&mut conn, None, "Null", None);

        let players = list_with_member_ids(&mut conn).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, with_id);
        assert_eq!(players[0].uscf_id, "14970943");
        assert_eq!(players[0].section.as_deref(), Some("Open"));
    }

    #[test]
    fn test_tournament_players_sorted_by_name() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        conn.execute("INSERT INTO tournaments (id, name) VALUES (1, 'Spring Open'), (2, 'Summer')", [])
            .unwrap();
        insert_player(&mut conn, Some(1), "Maya", Some("2"));
        insert_player(&mut conn, Some(1), "Arjun", Some("1"));
        insert_player(&mut conn, Some(2), "Other", Some("3"));
        insert_player(&mut conn, Some(1), "No Id", None);

        let names: Vec<_> = list_by_tournament(&mut conn, 1)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Arjun", "Maya"]);
    }
}
