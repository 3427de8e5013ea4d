use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{NewsreelError, Result};
use crate::config::Config;
use crate::controller::PaginationController;
use crate::source::{NewsApiSource, NewsSource};
use crate::store::{ArticleStore, SqliteStore};

/// Long-lived services shared by the CLI commands and the terminal UI.
pub struct AppContext {
    pub store: Arc<dyn ArticleStore>,
    pub source: Arc<dyn NewsSource>,
    pub config: Config,
}

impl AppContext {
    pub fn new(db_path: Option<PathBuf>, config: Config) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };
        let store = Arc::new(SqliteStore::new(&db_path)?);
        Self::with_store(store, config)
    }

    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_store(Arc::new(SqliteStore::in_memory()?), config)
    }

    fn with_store(store: Arc<dyn ArticleStore>, config: Config) -> Result<Self> {
        let source = Arc::new(NewsApiSource::new(config.api.clone())?);
        Ok(Self {
            store,
            source,
            config,
        })
    }

    /// A fresh, idle controller over this context's source and cache.
    pub fn controller(&self) -> PaginationController {
        PaginationController::new(
            Arc::clone(&self.source),
            Arc::clone(&self.store),
            self.config.paging.clone(),
        )
    }

    /// Cached article by id, as the detail view resolves it.
    pub fn article(&self, id: &str) -> Result<crate::domain::Article> {
        self.store
            .get_article(id)?
            .ok_or_else(|| NewsreelError::ArticleNotFound(id.to_string()))
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| NewsreelError::Config("Could not find data directory".into()))?;
        let dir = data_dir.join("newsreel");
        std::fs::create_dir_all(&dir)?;
        Ok(dir.join("newsreel.db"))
    }
}
