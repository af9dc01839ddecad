use anyhow::{Context, Result};

use super::connection::DbConn;
use super::models::Tournament;

/// All tournaments, newest first
pub fn list_all(conn: &mut DbConn) -> Result<Vec<Tournament>> {
    let sql = "SELECT id, name, status, created_at FROM tournaments ORDER BY created_at DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to list tournaments")?;

    Ok(rows)
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        status: row.get(2)?,
        // Rows written by other tools may carry timestamps chrono can't read
        created_at: row.get(3).ok().flatten(),
    })
}
