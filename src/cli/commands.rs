use std::fmt::Write as _;

use crate::app::{AppContext, Result};
use crate::controller::{PaginationController, UiState};
use crate::domain::Article;

/// Load up to `pages` pages through the controller and print what it ends up showing.
pub async fn headlines(ctx: &AppContext, query: Option<&str>, pages: u32) -> Result<()> {
    let controller = ctx.controller();
    let query = query.map(str::trim).unwrap_or_default();

    let first = if query.is_empty() {
        controller.load_next_page()
    } else {
        controller.update_search_query(query)
    };
    wait(first).await;

    for _ in 1..pages {
        match controller.load_next_page() {
            Some(handle) => wait(Some(handle)).await,
            None => break,
        }
    }

    print!("{}", render_state(&controller, query));
    Ok(())
}

async fn wait(handle: Option<tokio::task::JoinHandle<()>>) {
    if let Some(handle) = handle {
        if let Err(e) = handle.await {
            tracing::warn!("Fetch task ended abnormally: {}", e);
        }
    }
}

fn render_state(controller: &PaginationController, query: &str) -> String {
    let mut out = String::new();
    match controller.state() {
        UiState::Loading => out.push_str("Still loading\n"),
        UiState::NoData => out.push_str(&no_data_message(query)),
        UiState::Success {
            articles,
            has_more_to_load,
        } => {
            out.push_str(&list_articles(&articles));
            if !has_more_to_load {
                out.push_str("-- end of list --\n");
            }
        }
        UiState::Error {
            message,
            is_pagination,
            ..
        } => {
            if is_pagination {
                out.push_str(&list_articles(&controller.loaded_articles()));
            }
            let _ = writeln!(out, "{}", message);
        }
    }
    out
}

fn no_data_message(query: &str) -> String {
    if query.is_empty() {
        "No news found\n".to_string()
    } else {
        format!("No results found for \"{}\"\n", query)
    }
}

fn list_articles(articles: &[Article]) -> String {
    let mut out = String::new();
    for (n, article) in articles.iter().enumerate() {
        let date = article
            .published_date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "          ".to_string());
        let _ = writeln!(
            out,
            "{:>3}. {} {} [{}]\n     {}",
            n + 1,
            date,
            article.display_title(),
            article.source,
            article.url
        );
    }
    out
}

pub fn cached(ctx: &AppContext) -> Result<()> {
    let articles = ctx.store.select_all()?;
    if articles.is_empty() {
        println!("No cached articles");
        return Ok(());
    }
    print!("{}", list_articles(&articles));
    Ok(())
}

pub fn open_article(ctx: &AppContext, id: &str) -> Result<()> {
    let article = ctx.article(id)?;
    println!("Opening {}", article.url);
    open::that(&article.url)?;
    Ok(())
}

pub fn clear_cache(ctx: &AppContext) -> Result<()> {
    let count = ctx.store.select_all()?.len();
    ctx.store.clear_all()?;
    println!("Removed {} cached articles", count);
    Ok(())
}
