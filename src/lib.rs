pub mod browser;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod rate_limiter;
pub mod report;
pub mod services;
pub mod sources;
pub mod table;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::config::AppConfig;
use crate::services::{RefreshService, SearchService};

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn build_config(cli: &Cli) -> AppConfig {
    AppConfig::new()
        .with_database_path(cli.database.clone())
        .with_head(cli.headful)
}

/// Prints the matches as a JSON array; an empty array on failure.
pub fn handle_search(config: AppConfig, term: &str, max_results: usize) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = SearchService::new(config);
        match service.search_players(term, max_results).await {
            Ok(players) => {
                println!("{}", serde_json::to_string_pretty(&players)?);
                Ok(())
            }
            Err(e) => {
                println!("[]");
                Err(e.into())
            }
        }
    })
}

pub fn handle_table(config: AppConfig, term: &str) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = SearchService::new(config);
        let outcome = service.search_table(term).await?;
        report::print_table_outcome(term, &outcome);
        Ok(())
    })
}

pub fn handle_lookup(config: AppConfig, member_id: Option<&str>) -> Result<()> {
    let member_id = member_id.unwrap_or(config.batch.default_member_id).to_string();
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = SearchService::new(config);
        let profile = service.lookup(&member_id).await?;
        report::print_profile(&profile);
        Ok(())
    })
}

pub fn handle_refresh_all(config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = RefreshService::new(config)?;
        service.run_all().await.map(|_| ())
    })
}

pub fn handle_refresh_tournaments(config: AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let service = RefreshService::new(config)?;
        service.run_tournaments().await.map(|_| ())
    })
}
