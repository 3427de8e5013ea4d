//! Remote news sources.
//!
//! A [`NewsSource`] turns a page request into a typed [`PageFetchResult`].
//! HTTP-level failures come back as `PageFetchResult::Failure`; only
//! transport errors surface as `Err`.

mod config;
mod dto;
pub mod newsapi;

pub use config::NewsApiConfig;
pub use newsapi::NewsApiSource;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::PageFetchResult;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Fetch one page. A blank `query` means the unfiltered headline feed.
    async fn fetch_page(&self, page: u32, page_size: u32, query: &str) -> Result<PageFetchResult>;
}
