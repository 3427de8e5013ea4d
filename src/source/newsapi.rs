use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::app::Result;
use crate::domain::{FetchFailure, PageFetchResult};
use crate::source::dto::{ErrorResponse, NewsResponse};
use crate::source::{NewsApiConfig, NewsSource};

pub const MALFORMED_RESPONSE: &str = "malformedResponse";

pub struct NewsApiSource {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiSource {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("newsreel/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Build the request URL: headline feed for a blank query, search otherwise.
    pub fn page_url(&self, page: u32, page_size: u32, query: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let page = page.to_string();
        let page_size = page_size.to_string();

        let url = if query.trim().is_empty() {
            Url::parse_with_params(
                &format!("{}/top-headlines", base),
                &[
                    ("country", self.config.country.as_str()),
                    ("page", page.as_str()),
                    ("pageSize", page_size.as_str()),
                    ("apiKey", self.config.api_key.as_str()),
                ],
            )?
        } else {
            Url::parse_with_params(
                &format!("{}/everything", base),
                &[
                    ("q", query.trim()),
                    ("page", page.as_str()),
                    ("pageSize", page_size.as_str()),
                    ("apiKey", self.config.api_key.as_str()),
                ],
            )?
        };

        Ok(url)
    }

    fn parse_failure(status: StatusCode, body: &[u8]) -> FetchFailure {
        match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(error) => FetchFailure::new(error.code, error.message),
            Err(_) => FetchFailure::new(
                format!("http{}", status.as_u16()),
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected response")
                    .to_string(),
            ),
        }
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    async fn fetch_page(&self, page: u32, page_size: u32, query: &str) -> Result<PageFetchResult> {
        let url = self.page_url(page, page_size, query)?;
        debug!(page, page_size, query, "Requesting {}", url.path());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let failure = Self::parse_failure(status, &body);
            debug!(code = %failure.code, "News API returned {}", status);
            return Ok(PageFetchResult::Failure(failure));
        }

        match serde_json::from_slice::<NewsResponse>(&body) {
            Ok(response) => {
                let total_available = response.total_results;
                let articles = response.into_articles();
                debug!(
                    "Fetched {} articles (total available: {})",
                    articles.len(),
                    total_available
                );
                Ok(PageFetchResult::Success {
                    articles,
                    total_available,
                })
            }
            Err(e) => Ok(PageFetchResult::Failure(FetchFailure::new(
                MALFORMED_RESPONSE,
                e.to_string(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> NewsApiSource {
        NewsApiSource::new(NewsApiConfig {
            base_url: server.uri(),
            api_key: "test-key".into(),
            country: "gb".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    const ONE_ARTICLE: &str = r#"{
        "status": "ok",
        "totalResults": 42,
        "articles": [{
            "source": {"id": null, "name": "Example Wire"},
            "title": "Headline",
            "url": "https://example.com/headline",
            "publishedAt": "2024-05-01T12:30:00Z"
        }]
    }"#;

    #[test]
    fn test_page_url_routes_on_query() {
        let source = NewsApiSource::new(NewsApiConfig {
            api_key: "k".into(),
            ..Default::default()
        })
        .unwrap();

        let headlines = source.page_url(2, 20, "   ").unwrap();
        assert_eq!(headlines.path(), "/v2/top-headlines");
        assert_eq!(
            headlines.query(),
            Some("country=us&page=2&pageSize=20&apiKey=k")
        );

        let search = source.page_url(1, 10, "rust lang").unwrap();
        assert_eq!(search.path(), "/v2/everything");
        assert_eq!(search.query(), Some("q=rust+lang&page=1&pageSize=10&apiKey=k"));
    }

    #[tokio::test]
    async fn test_fetch_top_headlines() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(query_param("country", "gb"))
            .and(query_param("page", "3"))
            .and(query_param("pageSize", "20"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ONE_ARTICLE))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_page(3, 20, "").await.unwrap();
        match result {
            PageFetchResult::Success {
                articles,
                total_available,
            } => {
                assert_eq!(total_available, 42);
                assert_eq!(articles.len(), 1);
                assert_eq!(articles[0].id, "https://example.com/headline");
                assert_eq!(articles[0].source, "Example Wire");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/everything"))
            .and(query_param("q", "climate"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ONE_ARTICLE))
            .mount(&server)
            .await;

        let result = source_for(&server)
            .fetch_page(1, 20, "climate")
            .await
            .unwrap();
        assert!(matches!(result, PageFetchResult::Success { .. }));
    }

    #[tokio::test]
    async fn test_error_body_becomes_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(426).set_body_string(
                r#"{"status":"error","code":"maximumResultsReached","message":"You have requested too many results."}"#,
            ))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_page(6, 20, "").await.unwrap();
        assert_eq!(
            result,
            PageFetchResult::Failure(FetchFailure::new(
                "maximumResultsReached",
                "You have requested too many results."
            ))
        );
    }

    #[tokio::test]
    async fn test_unparseable_error_uses_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_page(1, 20, "").await.unwrap();
        match result {
            PageFetchResult::Failure(failure) => {
                assert_eq!(failure.code, "http503");
                assert_eq!(failure.message, "Service Unavailable");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"status\":\"ok\"}"))
            .mount(&server)
            .await;

        let result = source_for(&server).fetch_page(1, 20, "").await.unwrap();
        match result {
            PageFetchResult::Failure(failure) => assert_eq!(failure.code, MALFORMED_RESPONSE),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let source = NewsApiSource::new(NewsApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let result = source.fetch_page(1, 20, "").await;
        assert!(result.is_err());
    }
}
