use serde::{Deserialize, Serialize};

/// Paging behaviour of the article list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingConfig {
    /// Articles requested per page (default: 20)
    pub page_size: u32,

    /// Trailing items left below the viewport before the next page is requested (default: 2)
    pub prefetch_distance: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            prefetch_distance: 2,
        }
    }
}

impl PagingConfig {
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

/// True when at most `prefetch_distance` items follow the last visible one.
pub fn is_near_end(last_visible_index: usize, total: usize, prefetch_distance: usize) -> bool {
    if total == 0 {
        return false;
    }
    let remaining = total.saturating_sub(last_visible_index.saturating_add(1));
    remaining <= prefetch_distance
}
