//! Page-specific extraction against the three federation sites.

pub mod cards;
pub mod form;
pub mod profile;

use crate::browser::BrowserSession;
use crate::config::AppConfig;
use crate::domain::{PlayerRecord, ProfileInfo};
use crate::errors::ScrapeError;
use crate::table::TableOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Member search form with a results table
    FormSearch,
    /// Fuzzy name search rendered as player cards
    CardSearch,
    /// Rating profile plus membership detail page
    ProfilePage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Name { term: String, max_results: usize },
    Member(String),
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Name { term, max_results } => write!(f, "name '{}' (max {})", term, max_results),
            Query::Member(id) => write!(f, "member {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Table(TableOutcome),
    Players(Vec<PlayerRecord>),
    Profile(ProfileInfo),
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::FormSearch => "form search",
            SourceKind::CardSearch => "card search",
            SourceKind::ProfilePage => "profile page",
        }
    }

    pub async fn extract(
        &self,
        session: &BrowserSession,
        config: &AppConfig,
        query: &Query,
    ) -> Result<Extraction, ScrapeError> {
        let page = session.page();

        match (self, query) {
            (SourceKind::FormSearch, Query::Name { term, .. }) => {
                form::search_table(page, config, term).await.map(Extraction::Table)
            }
            (SourceKind::CardSearch, Query::Name { term, max_results }) => {
                cards::search_players(page, config, term, *max_results)
                    .await
                    .map(Extraction::Players)
            }
            (SourceKind::ProfilePage, Query::Member(member_id)) => {
                profile::lookup(page, config, member_id).await.map(Extraction::Profile)
            }
            _ => Err(ScrapeError::InvalidQuery {
                source_name: self.name(),
                query: query.to_string(),
            }),
        }
    }
}
