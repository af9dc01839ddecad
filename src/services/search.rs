use log::info;

use crate::browser::with_session;
use crate::config::AppConfig;
use crate::domain::{ProfileInfo, SearchPlayer};
use crate::errors::ScrapeError;
use crate::sources::{Extraction, Query, SourceKind};
use crate::table::TableOutcome;

/// One-shot lookups, each in its own browser session
pub struct SearchService {
    config: AppConfig,
}

impl SearchService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn search_players(&self, term: &str, max_results: usize) -> Result<Vec<SearchPlayer>, ScrapeError> {
        let query = Query::Name {
            term: term.to_string(),
            max_results,
        };
        match self.run(SourceKind::CardSearch, query).await? {
            Extraction::Players(players) => Ok(players.into_iter().map(SearchPlayer::from).collect()),
            other => Err(unexpected(SourceKind::CardSearch, &other)),
        }
    }

    pub async fn search_table(&self, term: &str) -> Result<TableOutcome, ScrapeError> {
        let query = Query::Name {
            term: term.to_string(),
            max_results: usize::MAX,
        };
        match self.run(SourceKind::FormSearch, query).await? {
            Extraction::Table(outcome) => Ok(outcome),
            other => Err(unexpected(SourceKind::FormSearch, &other)),
        }
    }

    pub async fn lookup(&self, member_id: &str) -> Result<ProfileInfo, ScrapeError> {
        match self.run(SourceKind::ProfilePage, Query::Member(member_id.to_string())).await? {
            Extraction::Profile(profile) => Ok(profile),
            other => Err(unexpected(SourceKind::ProfilePage, &other)),
        }
    }

    async fn run(&self, source: SourceKind, query: Query) -> Result<Extraction, ScrapeError> {
        info!("Running {} for {}", source.name(), query);

        with_session(&self.config.browser, |session| async move {
            source.extract(&session, &self.config, &query).await
        })
        .await
    }
}

fn unexpected(source: SourceKind, extraction: &Extraction) -> ScrapeError {
    ScrapeError::ParseFailure(format!("{} result, got {:?}", source.name(), extraction))
}
