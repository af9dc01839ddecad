//! Two-stage parsing of the form-search results table.
//!
//! The structured stage reads the table the way a browser lays it out. Some
//! result pages nest their markup so that the structured stage succeeds with
//! nothing but empty cells; the fallback stage then splits the `<tbody>` with
//! patterns so at least the row and cell layout can be reported.

pub mod fallback;
pub mod structured;

use anyhow::Result;
use log::{info, warn};
use serde::Serialize;

use crate::errors::ScrapeError;
pub use fallback::{FallbackParser, FallbackReport};
pub use structured::{RawTable, parse_table};

pub const CANONICAL_COLUMNS: [&str; 11] = [
    "Name",
    "Member ID",
    "Regular Rating",
    "Quick Rating",
    "Blitz Rating",
    "Online Regular",
    "Online Quick",
    "Online Blitz",
    "Correspondence",
    "State",
    "Membership Expires",
];

const NAME_COLUMN: usize = 0;

/// Search results with the fixed column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl CanonicalTable {
    fn from_raw(raw: RawTable) -> Result<Self, ScrapeError> {
        let width = raw.column_count();
        if width != CANONICAL_COLUMNS.len() {
            return Err(ScrapeError::ParseFailure(format!(
                "results table with {} columns (expected {})",
                width,
                CANONICAL_COLUMNS.len()
            )));
        }

        let rows = raw
            .rows
            .into_iter()
            .map(|mut row| {
                if let Some(name) = row.get_mut(NAME_COLUMN) {
                    *name = name.as_deref().and_then(clean_name);
                }
                row
            })
            .collect();

        Ok(Self {
            columns: CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        })
    }
}

/// Keep the last line of a multi-line Name cell (flag icon and name share it)
pub fn clean_name(raw: &str) -> Option<String> {
    let last = raw.split('\n').next_back()?.trim();
    (!last.is_empty()).then(|| last.to_string())
}

/// Terminal result of parsing one results table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableOutcome {
    Populated(CanonicalTable),
    /// Structured parsing found nothing usable; this is what the body holds
    Diagnostic(FallbackReport),
    NoRows,
}

enum ParseState {
    Structured,
    Fallback(ScrapeError),
    Finished(TableOutcome),
}

pub struct TableParser {
    fallback: FallbackParser,
}

impl TableParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fallback: FallbackParser::new()?,
        })
    }

    pub fn parse(&self, html: &str) -> TableOutcome {
        let mut state = ParseState::Structured;
        loop {
            state = match state {
                ParseState::Structured => self.structured_stage(html),
                ParseState::Fallback(reason) => self.fallback_stage(html, &reason),
                ParseState::Finished(outcome) => return outcome,
            };
        }
    }

    fn structured_stage(&self, html: &str) -> ParseState {
        let raw = match parse_table(html) {
            Ok(raw) => raw,
            Err(e) => return ParseState::Fallback(e),
        };

        if raw.is_all_empty() {
            return ParseState::Fallback(ScrapeError::ParseFailure(format!(
                "results table ({} rows, every cell empty)",
                raw.rows.len()
            )));
        }

        match CanonicalTable::from_raw(raw) {
            Ok(table) => ParseState::Finished(TableOutcome::Populated(table)),
            Err(e) => ParseState::Fallback(e),
        }
    }

    fn fallback_stage(&self, html: &str, reason: &ScrapeError) -> ParseState {
        warn!("Structured table parse unusable ({}), trying fallback", reason);

        let report = match self.fallback.parse(html) {
            Some(report) if report.row_count() > 0 => report,
            _ => return ParseState::Finished(TableOutcome::NoRows),
        };

        info!("Found {} rows in tbody", report.row_count());
        for (i, row) in report.rows.iter().take(3).enumerate() {
            info!("Row {}: {} cells", i, row.len());
            for (j, cell) in row.iter().enumerate() {
                info!("  Cell {}: '{}'", j, cell);
            }
        }

        ParseState::Finished(TableOutcome::Diagnostic(report))
    }
}
