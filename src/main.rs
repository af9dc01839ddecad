use anyhow::Result;

use uschess_scrape::cli::{Cli, Command};
use uschess_scrape::{
    build_config, handle_lookup, handle_refresh_all, handle_refresh_tournaments, handle_search, handle_table,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(&cli)
}

fn execute_command(cli: &Cli) -> Result<()> {
    let config = build_config(cli);
    match &cli.command {
        Command::Search {
            search_term,
            max_results,
        } => handle_search(config, search_term, *max_results),
        Command::Table { search_term } => handle_table(config, search_term),
        Command::Lookup { member_id } => handle_lookup(config, member_id.as_deref()),
        Command::All => handle_refresh_all(config),
        Command::Tournaments => handle_refresh_tournaments(config),
    }
}
