//! Wire shapes of the news API and their mapping into domain articles.

use html_escape::decode_html_entities;
use serde::Deserialize;

use crate::domain::Article;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewsResponse {
    #[allow(dead_code)]
    pub status: String,
    pub total_results: u32,
    #[serde(default)]
    pub articles: Vec<ArticleDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArticleDto {
    pub source: Option<SourceDto>,
    #[allow(dead_code)]
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SourceDto {
    #[allow(dead_code)]
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[allow(dead_code)]
    pub status: String,
    pub code: String,
    pub message: String,
}

fn decoded(text: Option<String>) -> String {
    text.map(|t| decode_html_entities(&t).to_string())
        .unwrap_or_default()
}

impl ArticleDto {
    /// Articles without a URL have no stable identity and are skipped.
    pub fn into_article(self) -> Option<Article> {
        let url = self.url.filter(|u| !u.trim().is_empty())?;
        let source = self
            .source
            .and_then(|s| s.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Some(Article {
            id: url.clone(),
            title: decoded(self.title),
            description: decoded(self.description),
            content: decoded(self.content),
            url,
            image_url: self.url_to_image.unwrap_or_default(),
            source,
            published_at: self.published_at.unwrap_or_default(),
        })
    }
}

impl NewsResponse {
    pub fn into_articles(self) -> Vec<Article> {
        self.articles
            .into_iter()
            .filter_map(ArticleDto::into_article)
            .collect()
    }
}
