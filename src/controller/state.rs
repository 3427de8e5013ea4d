use std::collections::HashSet;

use crate::domain::Article;

/// Snapshot published to the presentation layer after every transition.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState {
    Loading,
    Success {
        articles: Vec<Article>,
        has_more_to_load: bool,
    },
    Error {
        message: String,
        is_pagination: bool,
        is_max_results_reached: bool,
    },
    NoData,
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Phase {
    Idle,
    Loading,
    Ready,
    Empty,
    Failed {
        message: String,
        is_pagination: bool,
        is_max_results_reached: bool,
    },
}

/// Everything the controller knows about the current paging session.
#[derive(Debug)]
pub(crate) struct Session {
    pub articles: Vec<Article>,
    seen: HashSet<String>,
    pub current_page: u32,
    pub has_more_to_load: bool,
    pub total_available: Option<u32>,
    pub search_query: String,
    pub is_loading: bool,
    pub is_loading_next_page: bool,
    pub is_refreshing: bool,
    pub phase: Phase,
    /// Bumped whenever an in-flight result must no longer be applied.
    pub generation: u64,
    pub restart_pending: bool,
    pub disposed: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            seen: HashSet::new(),
            current_page: 1,
            has_more_to_load: true,
            total_available: None,
            search_query: String::new(),
            is_loading: false,
            is_loading_next_page: false,
            is_refreshing: false,
            phase: Phase::Idle,
            generation: 0,
            restart_pending: false,
            disposed: false,
        }
    }
}

impl Session {
    pub fn ui_state(&self) -> UiState {
        match &self.phase {
            Phase::Idle | Phase::Loading => UiState::Loading,
            Phase::Ready => UiState::Success {
                articles: self.articles.clone(),
                has_more_to_load: self.has_more_to_load,
            },
            Phase::Empty => UiState::NoData,
            Phase::Failed {
                message,
                is_pagination,
                is_max_results_reached,
            } => UiState::Error {
                message: message.clone(),
                is_pagination: *is_pagination,
                is_max_results_reached: *is_max_results_reached,
            },
        }
    }

    /// Whether a fetch started under `generation` may still touch the session.
    pub fn accepts(&self, generation: u64) -> bool {
        !self.disposed && self.generation == generation
    }

    /// Append the articles whose id is not loaded yet. Returns how many were added.
    pub fn merge(&mut self, incoming: &[Article]) -> usize {
        let before = self.articles.len();
        for article in incoming {
            if self.seen.insert(article.id.clone()) {
                self.articles.push(article.clone());
            }
        }
        self.articles.len() - before
    }

    /// Whether more pages may exist given the last total the source reported.
    pub fn more_available(&self) -> bool {
        self.total_available
            .map_or(true, |total| (self.articles.len() as u64) < u64::from(total))
    }

    /// Back to page one with nothing loaded, keeping the search query.
    pub fn reset_for_refresh(&mut self) {
        self.articles.clear();
        self.seen.clear();
        self.current_page = 1;
        self.has_more_to_load = true;
        self.total_available = None;
        self.is_refreshing = true;
    }

    pub fn clear_busy(&mut self) {
        self.is_loading = false;
        self.is_loading_next_page = false;
        self.is_refreshing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn articles(ids: &[usize]) -> Vec<Article> {
        ids.iter()
            .map(|n| Article::from_url(format!("https://example.com/{}", n)))
            .collect()
    }

    #[test]
    fn test_merge_skips_known_ids() {
        let mut session = Session::default();
        assert_eq!(session.merge(&articles(&[1, 2, 3])), 3);
        assert_eq!(session.merge(&articles(&[3, 4, 2, 5])), 2);

        let ids: Vec<&str> = session.articles.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "https://example.com/1",
                "https://example.com/2",
                "https://example.com/3",
                "https://example.com/4",
                "https://example.com/5",
            ]
        );
    }

    #[test]
    fn test_merge_dedups_within_one_page() {
        let mut session = Session::default();
        assert_eq!(session.merge(&articles(&[1, 1, 2])), 2);
        assert_eq!(session.articles.len(), 2);
    }

    #[test]
    fn test_reset_forgets_seen_ids() {
        let mut session = Session::default();
        session.merge(&articles(&[1, 2]));
        session.current_page = 3;
        session.has_more_to_load = false;
        session.total_available = Some(2);

        session.reset_for_refresh();

        assert!(session.articles.is_empty());
        assert_eq!(session.current_page, 1);
        assert!(session.has_more_to_load);
        assert_eq!(session.total_available, None);
        assert!(session.is_refreshing);
        assert_eq!(session.merge(&articles(&[1])), 1);
    }

    #[test]
    fn test_more_available() {
        let mut session = Session::default();
        assert!(session.more_available());

        session.merge(&articles(&[1, 2]));
        session.total_available = Some(3);
        assert!(session.more_available());

        session.total_available = Some(2);
        assert!(!session.more_available());
    }

    #[test]
    fn test_ui_state_follows_phase() {
        let mut session = Session::default();
        assert_eq!(session.ui_state(), UiState::Loading);

        session.merge(&articles(&[1]));
        session.phase = Phase::Ready;
        session.has_more_to_load = false;
        assert_eq!(
            session.ui_state(),
            UiState::Success {
                articles: articles(&[1]),
                has_more_to_load: false,
            }
        );

        session.phase = Phase::Empty;
        assert_eq!(session.ui_state(), UiState::NoData);

        session.phase = Phase::Failed {
            message: "boom".into(),
            is_pagination: true,
            is_max_results_reached: false,
        };
        assert_eq!(
            session.ui_state(),
            UiState::Error {
                message: "boom".into(),
                is_pagination: true,
                is_max_results_reached: false,
            }
        );
    }

    #[test]
    fn test_accepts_only_current_generation() {
        let mut session = Session::default();
        session.generation = 4;
        assert!(session.accepts(4));
        assert!(!session.accepts(3));

        session.disposed = true;
        assert!(!session.accepts(4));
    }
}
