pub mod article;
pub mod page;

pub use article::Article;
pub use page::{FailureKind, FetchFailure, PageFetchResult, MAX_RESULTS_REACHED, UNKNOWN_CODE};
