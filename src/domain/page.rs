use crate::domain::Article;

/// Failure code the news API reports once an account's result cap is hit.
pub const MAX_RESULTS_REACHED: &str = "maximumResultsReached";

/// Code used for failures that never produced a typed payload.
pub const UNKNOWN_CODE: &str = "unknown";

/// Outcome of fetching one page from a news source.
#[derive(Debug, Clone, PartialEq)]
pub enum PageFetchResult {
    Success {
        articles: Vec<Article>,
        total_available: u32,
    },
    Failure(FetchFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Terminal for the current paging session.
    QuotaExceeded,
    /// Anything else; the user may retry.
    NetworkOrServer,
}

impl FetchFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(UNKNOWN_CODE, message)
    }

    pub fn kind(&self) -> FailureKind {
        if self.code == MAX_RESULTS_REACHED {
            FailureKind::QuotaExceeded
        } else {
            FailureKind::NetworkOrServer
        }
    }
}
