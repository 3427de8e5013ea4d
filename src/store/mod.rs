pub mod sqlite;

use crate::app::Result;
use crate::domain::Article;

pub use sqlite::SqliteStore;

/// Persistent article cache keyed by article id.
pub trait ArticleStore: Send + Sync {
    /// Insert-or-replace every article as one all-or-nothing batch.
    fn upsert_many(&self, articles: &[Article]) -> Result<usize>;
    fn select_all(&self) -> Result<Vec<Article>>;
    fn get_article(&self, id: &str) -> Result<Option<Article>>;
    fn clear_all(&self) -> Result<()>;
}
