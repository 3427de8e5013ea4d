use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news article.
///
/// Identity is the canonical article URL: two articles with the same `id`
/// are the same article even if the remote source reworded the rest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub url: String,
    pub image_url: String,
    pub source: String,
    pub published_at: String,
}

impl Article {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: url.clone(),
            url,
            ..Default::default()
        }
    }

    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            "(Untitled)"
        } else {
            title
        }
    }

    /// Best available body text, without the "… [+123 chars]" truncation
    /// marker the news API appends to `content`.
    pub fn display_content(&self) -> &str {
        let body = if self.content.trim().is_empty() {
            self.description.as_str()
        } else {
            strip_truncation_marker(&self.content)
        };
        body.trim()
    }

    /// Publication time, when the opaque timestamp happens to be RFC 3339.
    pub fn published_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

impl PartialEq for Article {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Article {}

impl Hash for Article {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

fn strip_truncation_marker(content: &str) -> &str {
    let trimmed = content.trim_end();
    if !trimmed.ends_with("chars]") {
        return content;
    }
    match trimmed.rfind("[+") {
        Some(start) => trimmed[..start].trim_end().trim_end_matches('…'),
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_id() {
        let mut a = Article::from_url("https://example.com/a");
        a.title = "First headline".into();
        let mut b = Article::from_url("https://example.com/a");
        b.title = "Edited headline".into();
        let c = Article::from_url("https://example.com/c");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_hash_follows_id() {
        let mut set = std::collections::HashSet::new();
        set.insert(Article::from_url("https://example.com/a"));
        let mut dup = Article::from_url("https://example.com/a");
        dup.source = "Wire".into();
        assert!(!set.insert(dup));
    }

    #[test]
    fn test_from_url_uses_url_as_id() {
        let article = Article::from_url("https://example.com/story");
        assert_eq!(article.id, "https://example.com/story");
        assert_eq!(article.url, article.id);
        assert!(article.title.is_empty());
    }

    #[test]
    fn test_display_title_falls_back() {
        let mut article = Article::from_url("https://example.com/a");
        assert_eq!(article.display_title(), "(Untitled)");
        article.title = "  Markets rally  ".into();
        assert_eq!(article.display_title(), "Markets rally");
    }

    #[test]
    fn test_display_content_strips_marker() {
        let mut article = Article::from_url("https://example.com/a");
        article.content = "Stocks rose sharply on Monday… [+2140 chars]".into();
        assert_eq!(article.display_content(), "Stocks rose sharply on Monday");
    }

    #[test]
    fn test_display_content_falls_back_to_description() {
        let mut article = Article::from_url("https://example.com/a");
        article.description = "Short summary".into();
        assert_eq!(article.display_content(), "Short summary");
    }

    #[test]
    fn test_display_content_keeps_plain_brackets() {
        let mut article = Article::from_url("https://example.com/a");
        article.content = "Vote counts [updated]".into();
        assert_eq!(article.display_content(), "Vote counts [updated]");
    }

    #[test]
    fn test_published_date_parses_rfc3339() {
        let mut article = Article::from_url("https://example.com/a");
        article.published_at = "2024-05-01T12:30:00Z".into();
        let date = article.published_date().unwrap();
        assert_eq!(date.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 12:30");

        article.published_at = "yesterday".into();
        assert!(article.published_date().is_none());
    }
}
