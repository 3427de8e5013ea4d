//! # newsreel
//!
//! A terminal news reader over a NewsAPI-compatible backend, with an
//! SQLite cache that keeps the last pages readable offline.
//!
//! ```text
//! NewsSource ─┐
//!             ├─> PaginationController ──UiState──> tui / cli
//! ArticleStore┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export NEWSREEL_API_KEY=...
//! newsreel headlines --pages 2
//! newsreel headlines --query "rust language"
//! newsreel tui
//! ```

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
///
/// - `headlines [--query Q] [--pages N]` - print headlines or search results
/// - `cached` - print the cached articles
/// - `open <id>` - open a cached article in the browser
/// - `clear-cache` - empty the cache
/// - `tui` - launch the TUI
pub mod cli;

/// Configuration file (`~/.config/newsreel/config.toml`): API settings,
/// paging, colours and key bindings.
pub mod config;

/// Paging, de-duplication, cache fallback and the published [`UiState`](controller::UiState).
pub mod controller;

/// Core domain models.
///
/// - [`Article`](domain::Article): one news item, identified by its URL
/// - [`PageFetchResult`](domain::PageFetchResult): typed outcome of a page request
pub mod domain;

/// Remote news sources.
pub mod source;

/// SQLite article cache.
pub mod store;

/// Terminal user interface built with ratatui.
///
/// Article list on the left, preview on the right. j/k move, `/` searches,
/// r retries, R refreshes, o opens in the browser, q quits.
pub mod tui;
