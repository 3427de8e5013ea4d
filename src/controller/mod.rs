//! Paginated article list with cache fallback.
//!
//! [`PaginationController`] owns the paging cursor, de-duplication, cache
//! read-through/write-through and error classification, and publishes an
//! immutable [`UiState`] after every transition. At most one fetch is in
//! flight per controller; calls that arrive while it runs are dropped.

mod config;
mod state;

pub use config::{is_near_end, PagingConfig};
pub use state::UiState;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::{NewsreelError, Result};
use crate::domain::{Article, FailureKind, FetchFailure, PageFetchResult};
use crate::source::NewsSource;
use crate::store::ArticleStore;

use self::state::{Phase, Session};

/// Shown for a quota failure whose payload carries no message.
pub const MAX_RESULTS_MESSAGE: &str =
    "You've reached the maximum number of results for your account.";

struct PageRequest {
    generation: u64,
    page: u32,
    page_size: u32,
    query: String,
    clear_cache: bool,
}

struct Inner {
    source: Arc<dyn NewsSource>,
    store: Arc<dyn ArticleStore>,
    config: PagingConfig,
    session: Mutex<Session>,
    in_flight: Mutex<Option<tokio::task::AbortHandle>>,
    state_tx: watch::Sender<UiState>,
}

pub struct PaginationController {
    inner: Arc<Inner>,
}

impl PaginationController {
    /// Create an idle controller. Nothing is fetched until the first
    /// [`load_next_page`](Self::load_next_page).
    pub fn new(
        source: Arc<dyn NewsSource>,
        store: Arc<dyn ArticleStore>,
        config: PagingConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(UiState::Loading);
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                config,
                session: Mutex::new(Session::default()),
                in_flight: Mutex::new(None),
                state_tx,
            }),
        }
    }

    /// Create a controller and start the initial load. Must be called from
    /// within a tokio runtime.
    pub fn launch(
        source: Arc<dyn NewsSource>,
        store: Arc<dyn ArticleStore>,
        config: PagingConfig,
    ) -> Self {
        let controller = Self::new(source, store, config);
        controller.load_next_page();
        controller
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.inner.state_tx.subscribe()
    }

    pub fn state(&self) -> UiState {
        self.inner.state_tx.borrow().clone()
    }

    pub fn loaded_articles(&self) -> Vec<Article> {
        self.inner.lock().articles.clone()
    }

    pub fn is_loading_next_page(&self) -> bool {
        self.inner.lock().is_loading_next_page
    }

    pub fn is_refreshing(&self) -> bool {
        self.inner.lock().is_refreshing
    }

    pub fn search_query(&self) -> String {
        self.inner.lock().search_query.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.inner.lock().current_page
    }

    pub fn has_more_to_load(&self) -> bool {
        self.inner.lock().has_more_to_load
    }

    pub fn config(&self) -> &PagingConfig {
        &self.inner.config
    }

    /// Fetch the next page unless a fetch is running or the list is exhausted.
    ///
    /// Returns the handle of the spawned fetch, or `None` when the call was dropped.
    pub fn load_next_page(&self) -> Option<JoinHandle<()>> {
        let mut session = self.inner.lock();
        if session.disposed {
            return None;
        }
        if session.is_loading || !session.has_more_to_load {
            debug!(
                is_loading = session.is_loading,
                has_more_to_load = session.has_more_to_load,
                "Page load skipped"
            );
            return None;
        }
        Some(self.inner.start_fetch(&mut session, false))
    }

    /// Drop everything loaded, clear the cache and load page one again.
    pub fn refresh(&self) -> Option<JoinHandle<()>> {
        let mut session = self.inner.lock();
        if session.disposed {
            return None;
        }
        if session.is_loading {
            debug!("Refresh skipped while a fetch is in flight");
            return None;
        }
        info!(query = %session.search_query, "Refreshing articles");
        session.reset_for_refresh();
        Some(self.inner.start_fetch(&mut session, true))
    }

    pub fn retry(&self) -> Option<JoinHandle<()>> {
        self.load_next_page()
    }

    /// Switch the filter. An unchanged query is a no-op; a changed one
    /// refreshes. If a fetch is in flight its result is discarded and the
    /// refresh starts as soon as it completes (the returned handle is then `None`).
    pub fn update_search_query(&self, query: &str) -> Option<JoinHandle<()>> {
        let mut session = self.inner.lock();
        if session.disposed || session.search_query == query {
            return None;
        }
        info!(query, "Search query changed");
        session.search_query = query.to_string();
        session.reset_for_refresh();

        if session.is_loading {
            session.generation += 1;
            session.restart_pending = true;
            session.phase = Phase::Loading;
            self.inner.publish(&session);
            return None;
        }
        Some(self.inner.start_fetch(&mut session, true))
    }

    /// Presentation hook: the list has been scrolled so that
    /// `last_visible_index` is the last item on screen.
    pub fn on_scrolled(&self, last_visible_index: usize) -> Option<JoinHandle<()>> {
        let (total, loading_next) = {
            let session = self.inner.lock();
            (session.articles.len(), session.is_loading_next_page)
        };
        if loading_next
            || !is_near_end(last_visible_index, total, self.inner.config.prefetch_distance)
        {
            return None;
        }
        self.load_next_page()
    }

    /// Stop applying results. Any in-flight fetch is aborted.
    pub fn dispose(&self) {
        let mut session = self.inner.lock();
        if session.disposed {
            return;
        }
        session.disposed = true;
        drop(session);

        if let Some(handle) = self.inner.take_in_flight() {
            handle.abort();
        }
        debug!("Pagination controller disposed");
    }
}

impl Drop for PaginationController {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn take_in_flight(&self) -> Option<tokio::task::AbortHandle> {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn publish(&self, session: &Session) {
        self.state_tx.send_replace(session.ui_state());
    }

    fn start_fetch(self: &Arc<Self>, session: &mut Session, clear_cache: bool) -> JoinHandle<()> {
        session.is_loading = true;
        session.is_loading_next_page = !session.articles.is_empty();
        session.phase = if session.is_loading_next_page {
            Phase::Ready
        } else {
            Phase::Loading
        };
        session.generation += 1;

        let request = PageRequest {
            generation: session.generation,
            page: session.current_page,
            page_size: self.config.effective_page_size(),
            query: session.search_query.clone(),
            clear_cache,
        };
        debug!(
            page = request.page,
            next_page = session.is_loading_next_page,
            refreshing = session.is_refreshing,
            "Starting fetch"
        );
        self.publish(session);

        let inner = Arc::clone(self);
        let handle = tokio::spawn(async move { inner.run(request).await });
        *self.in_flight.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(handle.abort_handle());
        handle
    }

    async fn run(self: Arc<Self>, request: PageRequest) {
        if request.clear_cache {
            if let Err(e) = self.on_store(|store| store.clear_all()).await {
                warn!("Failed to clear article cache: {}", e);
            }
        }

        let result = match self
            .source
            .fetch_page(request.page, request.page_size, &request.query)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                warn!("Fetching page {} failed: {}", request.page, e);
                PageFetchResult::Failure(FetchFailure::unknown(e.to_string()))
            }
        };

        match result {
            PageFetchResult::Success {
                articles,
                total_available,
            } => {
                if self.apply_page(request.generation, &articles, total_available) {
                    self.persist(articles).await;
                }
            }
            PageFetchResult::Failure(failure) => {
                if let Some(message) = self.apply_failure(request.generation, failure) {
                    let cached = match self.on_store(|store| store.select_all()).await {
                        Ok(cached) => cached,
                        Err(e) => {
                            warn!("Article cache unavailable: {}", e);
                            Vec::new()
                        }
                    };
                    self.apply_cache_fallback(request.generation, cached, message);
                }
            }
        }

        self.finish();
    }

    /// Merge a successful page. Returns whether the page should be cached.
    fn apply_page(&self, generation: u64, articles: &[Article], total_available: u32) -> bool {
        let mut session = self.lock();
        if !session.accepts(generation) {
            debug!("Discarding stale page");
            return false;
        }
        session.total_available = Some(total_available);

        if articles.is_empty() {
            session.has_more_to_load = false;
            if session.articles.is_empty() {
                debug!("Empty first page, no data");
                session.phase = Phase::Empty;
            } else {
                debug!("Empty page, end of stream");
                session.phase = Phase::Ready;
            }
            self.publish(&session);
            return false;
        }

        let added = session.merge(articles);
        if added == 0 {
            debug!("Page {} held only duplicates", session.current_page);
            session.has_more_to_load = false;
        } else {
            session.current_page += 1;
            session.has_more_to_load = session.more_available();
            info!(
                "Loaded {} new articles ({} total, more: {})",
                added,
                session.articles.len(),
                session.has_more_to_load
            );
        }
        session.phase = Phase::Ready;
        self.publish(&session);
        true
    }

    /// Classify a failure. Returns the message to use when the cache should
    /// be consulted, `None` when the failure has already been published.
    fn apply_failure(&self, generation: u64, failure: FetchFailure) -> Option<String> {
        let mut session = self.lock();
        if !session.accepts(generation) {
            debug!("Discarding stale failure");
            return None;
        }

        match failure.kind() {
            FailureKind::QuotaExceeded => {
                warn!("Result cap reached: {}", failure.message);
                let message = if failure.message.trim().is_empty() {
                    MAX_RESULTS_MESSAGE.to_string()
                } else {
                    failure.message
                };
                session.has_more_to_load = false;
                session.phase = Phase::Failed {
                    message,
                    is_pagination: !session.articles.is_empty(),
                    is_max_results_reached: true,
                };
                self.publish(&session);
                None
            }
            FailureKind::NetworkOrServer if !session.articles.is_empty() => {
                warn!(code = %failure.code, "Failed to load more: {}", failure.message);
                session.phase = Phase::Failed {
                    message: format!("Failed to load more.\n{}", failure.message),
                    is_pagination: true,
                    is_max_results_reached: false,
                };
                self.publish(&session);
                None
            }
            FailureKind::NetworkOrServer => {
                warn!(code = %failure.code, "Initial load failed: {}", failure.message);
                Some(failure.message)
            }
        }
    }

    fn apply_cache_fallback(&self, generation: u64, cached: Vec<Article>, message: String) {
        let mut session = self.lock();
        if !session.accepts(generation) {
            return;
        }

        if cached.is_empty() {
            session.phase = Phase::Failed {
                message: format!("Failed to load news.\n{}", message),
                is_pagination: false,
                is_max_results_reached: false,
            };
        } else {
            session.merge(&cached);
            session.has_more_to_load = session.more_available();
            session.phase = Phase::Ready;
            info!("Showing {} cached articles after failure", session.articles.len());
        }
        self.publish(&session);
    }

    async fn persist(&self, articles: Vec<Article>) {
        let count = articles.len();
        match self.on_store(move |store| store.upsert_many(&articles)).await {
            Ok(_) => debug!("Cached {} articles", count),
            Err(e) => warn!("Failed to cache {} articles: {}", count, e),
        }
    }

    fn finish(self: &Arc<Self>) {
        let mut session = self.lock();
        if session.disposed {
            return;
        }
        session.clear_busy();
        self.take_in_flight();

        if session.restart_pending {
            session.restart_pending = false;
            session.is_refreshing = true;
            self.start_fetch(&mut session, true);
        }
    }

    /// Run a store operation on the blocking pool.
    async fn on_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ArticleStore) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| NewsreelError::Other(format!("Cache task failed: {}", e)))?
    }
}
