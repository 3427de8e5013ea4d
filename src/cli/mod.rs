pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newsreel")]
#[command(about = "A terminal news reader with offline cache", long_about = None)]
pub struct Cli {
    /// News API key (overrides the config file)
    #[arg(long, env = "NEWSREEL_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Articles requested per page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Path of the article cache database
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and print headlines, or search results with --query
    Headlines {
        /// Search query; top headlines when omitted
        #[arg(short, long)]
        query: Option<String>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Print the cached articles
    Cached,
    /// Open a cached article in the browser
    Open {
        /// Article id (its URL)
        id: String,
    },
    /// Delete every cached article
    ClearCache,
    /// Launch the TUI
    Tui,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headlines_with_globals() {
        let cli = Cli::try_parse_from([
            "newsreel",
            "headlines",
            "--query",
            "rust",
            "--pages",
            "3",
            "--page-size",
            "10",
        ])
        .unwrap();

        assert_eq!(cli.page_size, Some(10));
        match cli.command {
            Commands::Headlines { query, pages } => {
                assert_eq!(query.as_deref(), Some("rust"));
                assert_eq!(pages, 3);
            }
            _ => panic!("expected headlines"),
        }
    }

    #[test]
    fn test_open_requires_id() {
        assert!(Cli::try_parse_from(["newsreel", "open"]).is_err());
        let cli = Cli::try_parse_from(["newsreel", "open", "https://example.com/a"]).unwrap();
        assert!(matches!(cli.command, Commands::Open { id } if id == "https://example.com/a"));
    }
}
