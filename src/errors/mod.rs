use std::time::Duration;

use thiserror::Error;

/// Failures of the extraction pipeline, from driver start-up to storage.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no browser could be started (tried: {})", attempts.join("; "))]
    DriverUnavailable { attempts: Vec<String> },

    #[error("failed to load {url}: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("timed out after {:.1}s waiting for {what}", after.as_secs_f64())]
    WaitTimeout { what: String, after: Duration },

    #[error("failed to parse {0}")]
    ParseFailure(String),

    #[error("storage write failed: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("browser interaction failed: {0}")]
    Browser(String),

    #[error("{source_name} cannot handle query {query}")]
    InvalidQuery { source_name: &'static str, query: String },
}

impl ScrapeError {
    pub fn browser(action: &str, err: impl std::fmt::Display) -> Self {
        ScrapeError::Browser(format!("{}: {}", action, err))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ScrapeError::WaitTimeout { .. })
    }
}

/// Add context to storage errors
pub fn storage_context(operation: &str, table: &str) -> String {
    format!("Failed to {} {}", operation, table)
}

/// Add context to lookup errors
pub fn lookup_context(member_id: &str) -> String {
    format!("Failed to look up member {}", member_id)
}
