use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsreel::app::AppContext;
use newsreel::cli::{commands, Cli, Commands};
use newsreel::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(api_key) = cli.api_key {
        config.api.api_key = api_key;
    }
    if let Some(page_size) = cli.page_size {
        config.paging.page_size = page_size;
    }

    let ctx = AppContext::new(cli.db, config)?;

    match cli.command {
        Commands::Headlines { query, pages } => {
            commands::headlines(&ctx, query.as_deref(), pages).await?;
        }
        Commands::Cached => {
            commands::cached(&ctx)?;
        }
        Commands::Open { id } => {
            commands::open_article(&ctx, &id)?;
        }
        Commands::ClearCache => {
            commands::clear_cache(&ctx)?;
        }
        Commands::Tui => {
            newsreel::tui::run(Arc::new(ctx)).await?;
        }
    }

    Ok(())
}
