use ratatui::widgets::ListState;

use crate::controller::{PaginationController, UiState};
use crate::domain::Article;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Articles,
    Preview,
}

impl ActivePane {
    pub fn toggle(self) -> Self {
        match self {
            ActivePane::Articles => ActivePane::Preview,
            ActivePane::Preview => ActivePane::Articles,
        }
    }
}

/// What fills the screen when there is no list to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    Loading { refreshing: bool },
    Failed { message: String, can_retry: bool },
    Empty { query: String },
}

/// Last row of the article list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    None,
    LoadingMore,
    Error(String),
    MaxResults(String),
    End,
}

pub const PAGE_SIZE: usize = 10;

pub struct TuiApp {
    pub active_pane: ActivePane,
    pub state: UiState,
    pub articles: Vec<Article>,
    pub is_loading_next_page: bool,
    pub is_refreshing: bool,
    pub search_query: String,
    pub selected: usize,
    pub list_state: ListState,
    pub preview_scroll: u16,
    pub maximized: bool,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Text typed so far while in search input mode.
    pub search_input: Option<String>,
}

impl TuiApp {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            active_pane: ActivePane::Articles,
            state: UiState::Loading,
            articles: Vec::new(),
            is_loading_next_page: false,
            is_refreshing: false,
            search_query: String::new(),
            selected: 0,
            list_state,
            preview_scroll: 0,
            maximized: false,
            should_quit: false,
            status_message: None,
            search_input: None,
        }
    }

    /// Copy the controller's published state into the view.
    pub fn sync(&mut self, controller: &PaginationController) {
        let state = controller.state();
        let articles = match &state {
            UiState::Success { articles, .. } => articles.clone(),
            UiState::Error {
                is_pagination: true,
                ..
            } => controller.loaded_articles(),
            _ => Vec::new(),
        };
        self.apply(
            state,
            articles,
            controller.is_loading_next_page(),
            controller.is_refreshing(),
            controller.search_query(),
        );
    }

    pub fn apply(
        &mut self,
        state: UiState,
        articles: Vec<Article>,
        is_loading_next_page: bool,
        is_refreshing: bool,
        search_query: String,
    ) {
        let selected_id = self.selected_article().map(|a| a.id.clone());
        self.state = state;
        self.articles = articles;
        self.is_loading_next_page = is_loading_next_page;
        self.is_refreshing = is_refreshing;
        self.search_query = search_query;

        // Keep the selection on the same article when pages are appended.
        let fallback = self.selected.min(self.articles.len().saturating_sub(1));
        let index = selected_id
            .and_then(|id| self.articles.iter().position(|a| a.id == id))
            .unwrap_or(fallback);
        self.select(index);
    }

    pub fn screen(&self) -> Screen {
        match &self.state {
            UiState::Loading => Screen::Loading {
                refreshing: self.is_refreshing,
            },
            UiState::NoData => Screen::Empty {
                query: self.search_query.clone(),
            },
            UiState::Error {
                message,
                is_pagination: false,
                is_max_results_reached,
            } => Screen::Failed {
                message: message.clone(),
                can_retry: !is_max_results_reached,
            },
            UiState::Success { .. } | UiState::Error { .. } => Screen::List,
        }
    }

    pub fn footer(&self) -> Footer {
        if self.is_loading_next_page {
            return Footer::LoadingMore;
        }
        match &self.state {
            UiState::Error {
                message,
                is_pagination: true,
                is_max_results_reached: true,
            } => Footer::MaxResults(message.clone()),
            UiState::Error {
                message,
                is_pagination: true,
                ..
            } => Footer::Error(message.clone()),
            UiState::Success {
                has_more_to_load: false,
                articles,
            } if !articles.is_empty() => Footer::End,
            _ => Footer::None,
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.articles.get(self.selected)
    }

    fn select(&mut self, index: usize) {
        if index != self.selected {
            self.preview_scroll = 0;
        }
        self.selected = index;
        self.list_state.select(Some(index));
    }

    /// Move the selection by `delta` rows. Returns the new index when the
    /// article pane moved, for the prefetch check.
    pub fn move_by(&mut self, delta: isize) -> Option<usize> {
        match self.active_pane {
            ActivePane::Articles => {
                if self.articles.is_empty() {
                    return None;
                }
                let last = self.articles.len() - 1;
                let target = self.selected.saturating_add_signed(delta).min(last);
                self.select(target);
                Some(target)
            }
            ActivePane::Preview => {
                let steps = delta.unsigned_abs().min(u16::MAX as usize) as u16;
                self.preview_scroll = if delta < 0 {
                    self.preview_scroll.saturating_sub(steps)
                } else {
                    self.preview_scroll.saturating_add(steps)
                };
                None
            }
        }
    }

    pub fn jump_top(&mut self) -> Option<usize> {
        self.move_by(isize::MIN / 2)
    }

    pub fn jump_bottom(&mut self) -> Option<usize> {
        self.move_by(isize::MAX / 2)
    }

    pub fn toggle_maximize(&mut self) {
        self.maximized = !self.maximized;
        if self.maximized {
            self.active_pane = ActivePane::Preview;
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn start_search(&mut self) {
        self.search_input = Some(self.search_query.clone());
    }
}

impl Default for TuiApp {
    fn default() -> Self {
        Self::new()
    }
}
