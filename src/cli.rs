use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "US Chess rating and membership scraper")]
pub struct Cli {
    /// SQLite database used by the refresh commands (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headful: bool,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Search players by name and print them as JSON
    Search {
        /// Name or partial name to search for
        search_term: String,
        /// Maximum number of player cards to read
        max_results: usize,
    },
    /// Search players through the form page and print the results table
    Table {
        /// Name or partial name to search for
        search_term: String,
    },
    /// Look up one member's rating and membership expiration
    Lookup {
        /// US Chess member id (defaults to a known member)
        member_id: Option<String>,
    },
    /// Refresh ratings and expirations of every stored player with a member id
    All,
    /// Refresh stored players tournament by tournament
    Tournaments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_with_globals() {
        let cli = Cli::parse_from(["uschess_scrape", "--headful", "search", "magnus", "5"]);
        assert!(cli.headful);
        assert_eq!(cli.database, None);
        assert_eq!(
            cli.command,
            Command::Search {
                search_term: "magnus".into(),
                max_results: 5
            }
        );
    }

    #[test]
    fn test_parse_lookup_without_member_id() {
        let cli = Cli::parse_from(["uschess_scrape", "lookup", "--database", "/tmp/t.db"]);
        assert_eq!(cli.database.as_deref(), Some("/tmp/t.db"));
        assert_eq!(cli.command, Command::Lookup { member_id: None });
    }

    #[test]
    fn test_rejects_non_numeric_max_results() {
        assert!(Cli::try_parse_from(["uschess_scrape", "search", "magnus", "many"]).is_err());
    }
}
