use serde::{Deserialize, Serialize};

/// Connection settings for the NewsAPI-compatible backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsApiConfig {
    /// Base URL without trailing slash (default: https://newsapi.org/v2)
    pub base_url: String,

    /// API key sent with every request
    pub api_key: String,

    /// Country filter for the headline feed (default: "us")
    pub country: String,

    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2".to_string(),
            api_key: String::new(),
            country: "us".to_string(),
            timeout_secs: 10,
        }
    }
}
