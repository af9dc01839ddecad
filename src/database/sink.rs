use log::{debug, warn};
use rusqlite::{Connection, params};

use super::connection::DbConn;
use crate::errors::ScrapeError;

/// What a lookup actually changed in the players table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkOutcome {
    pub rating_written: bool,
    pub expiration_written: bool,
}

/// Rating as stored: digits with optional thousands separators
pub fn storage_rating(raw: &str) -> Option<i64> {
    raw.trim().replace(',', "").parse().ok()
}

/// Add `players.expiration_date` unless it is already there.
///
/// Returns whether the column was added by this call.
pub fn ensure_expiration_column(conn: &Connection) -> Result<bool, ScrapeError> {
    match conn.execute("ALTER TABLE players ADD COLUMN expiration_date TEXT", []) {
        Ok(_) => {
            debug!("Added players.expiration_date");
            Ok(true)
        }
        Err(rusqlite::Error::SqliteFailure(_, Some(msg))) if msg.contains("duplicate column name") => {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Store a lookup result on player row `row_id`.
///
/// The rating is only written when it reads as an integer; the expiration
/// date is written whenever present.
pub fn record_lookup(
    conn: &mut DbConn,
    row_id: i64,
    rating: Option<&str>,
    expiration_date: Option<&str>,
) -> Result<SinkOutcome, ScrapeError> {
    ensure_expiration_column(conn)?;

    let tx = conn.transaction()?;
    let mut outcome = SinkOutcome::default();

    if let Some(raw) = rating {
        match storage_rating(raw) {
            Some(value) => {
                tx.execute("UPDATE players SET rating = ?1 WHERE id = ?2", params![value, row_id])?;
                outcome.rating_written = true;
            }
            None => warn!("Could not convert rating '{}' to integer for player {}", raw, row_id),
        }
    }

    if let Some(date) = expiration_date {
        tx.execute(
            "UPDATE players SET expiration_date = ?1 WHERE id = ?2",
            params![date, row_id],
        )?;
        outcome.expiration_written = true;
    }

    tx.commit()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::players::fixtures::insert_player;
    use crate::database::setup::ensure_schema;
    use crate::database::{create_memory_pool, get_connection};

    fn stored(conn: &DbConn, id: i64) -> (Option<i64>, Option<String>) {
        conn.query_row(
            "SELECT rating, expiration_date FROM players WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap()
    }

    #[test]
    fn test_storage_rating() {
        assert_eq!(storage_rating("2,104"), Some(2104));
        assert_eq!(storage_rating(" 1850 "), Some(1850));
        assert_eq!(storage_rating("Not found"), None);
        assert_eq!(storage_rating(""), None);
    }

    #[test]
    fn test_column_provisioning_is_idempotent() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();

        assert!(ensure_expiration_column(&conn).unwrap());
        assert!(!ensure_expiration_column(&conn).unwrap());
        assert!(!ensure_expiration_column(&conn).unwrap());
    }

    #[test]
    fn test_separated_rating_stored_as_integer() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();
        let id = insert_player(&mut conn, None, "Aarush", Some("14970943"));

        let outcome = record_lookup(&mut conn, id, Some("2,104"), Some("2026-05-31")).unwrap();

        assert_eq!(outcome, SinkOutcome { rating_written: true, expiration_written: true });
        assert_eq!(stored(&conn, id), (Some(2104), Some("2026-05-31".to_string())));
    }

    #[test]
    fn test_placeholder_rating_keeps_old_value() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();
        let id = insert_player(&mut conn, None, "Maya", Some("2"));
        conn.execute("UPDATE players SET rating = 1500 WHERE id = ?1", params![id]).unwrap();

        let outcome = record_lookup(&mut conn, id, Some("Not found"), Some("2025-12-31")).unwrap();

        assert!(!outcome.rating_written);
        assert!(outcome.expiration_written);
        assert_eq!(stored(&conn, id), (Some(1500), Some("2025-12-31".to_string())));
    }

    #[test]
    fn test_second_lookup_reuses_column() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();
        ensure_schema(&mut conn).unwrap();
        let id = insert_player(&mut conn, None, "Ben", Some("3"));

        record_lookup(&mut conn, id, Some("1400"), None).unwrap();
        let outcome = record_lookup(&mut conn, id, None, Some("2027-01-31")).unwrap();

        assert_eq!(outcome, SinkOutcome { rating_written: false, expiration_written: true });
        assert_eq!(stored(&conn, id), (Some(1400), Some("2027-01-31".to_string())));
    }

    #[test]
    fn test_missing_table_is_persistence_error() {
        let pool = create_memory_pool().unwrap();
        let mut conn = get_connection(&pool).unwrap();

        let err = record_lookup(&mut conn, 1, Some("1500"), None).unwrap_err();
        assert!(matches!(err, ScrapeError::Persistence(_)));
    }
}
