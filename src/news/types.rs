//! Shared types used by the news client.

use serde::Deserialize;
use thiserror::Error;

/// Errors returned while searching for news.
#[derive(Debug, Error)]
pub enum NewsError {
    /// HTTP layer failed before receiving a response, or the body could not be decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Default search window could not be rendered as RFC 3339.
    #[error("Failed to format search window: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Parameters for a single multi-language search.
#[derive(Debug, Clone, Default)]
pub struct FetchQuery {
    /// Inclusive lower bound on publication time; defaults to 24 hours ago.
    pub since: Option<String>,
    /// Languages to search, one outbound request each.
    pub languages: Vec<String>,
    /// Keywords OR-ed together; empty means no keyword filter.
    pub keywords: Vec<String>,
    /// Page size requested from the provider for each language.
    pub page_size: u32,
}

impl FetchQuery {
    /// Render the provider search expression.
    pub fn search_terms(&self) -> String {
        self.keywords.join(" OR ")
    }
}

/// A single news item normalized from a provider search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// URL, falling back to the title; empty when neither is present.
    pub id: String,
    /// Headline.
    pub title: Option<String>,
    /// Short description supplied by the provider.
    pub description: Option<String>,
    /// Truncated raw content snippet.
    pub content: Option<String>,
    /// Canonical article URL.
    pub url: Option<String>,
    /// ISO-8601 publication timestamp.
    pub published_at: Option<String>,
    /// Publisher name.
    pub source: Option<String>,
    /// Language tag of the query that produced this record.
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EverythingResponse {
    #[serde(default)]
    pub(crate) articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

impl RawArticle {
    pub(crate) fn into_record(self, language: &str) -> ArticleRecord {
        let id = [self.url.as_deref(), self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .unwrap_or_default()
            .to_string();

        ArticleRecord {
            id,
            title: self.title,
            description: self.description,
            content: self.content,
            url: self.url,
            published_at: self.published_at,
            source: self.source.and_then(|source| source.name),
            language: language.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawArticle {
        serde_json::from_value(value).expect("raw article")
    }

    #[test]
    fn search_terms_or_join_keywords() {
        let query = FetchQuery {
            keywords: vec!["election".into(), "budget".into()],
            ..FetchQuery::default()
        };
        assert_eq!(query.search_terms(), "election OR budget");
        assert_eq!(FetchQuery::default().search_terms(), "");
    }

    #[test]
    fn record_id_prefers_url() {
        let record = raw(json!({
            "title": "Headline",
            "url": "https://example.org/a",
            "publishedAt": "2025-01-01T00:00:00Z",
            "source": { "id": null, "name": "Example" }
        }))
        .into_record("en");
        assert_eq!(record.id, "https://example.org/a");
        assert_eq!(record.source.as_deref(), Some("Example"));
        assert_eq!(record.published_at.as_deref(), Some("2025-01-01T00:00:00Z"));
        assert_eq!(record.language, "en");
    }

    #[test]
    fn record_id_falls_back_to_title_then_empty() {
        let titled = raw(json!({ "title": "Only a title", "url": "" })).into_record("fr");
        assert_eq!(titled.id, "Only a title");

        let anonymous = raw(json!({ "title": null, "url": null })).into_record("fr");
        assert_eq!(anonymous.id, "");
        assert!(anonymous.source.is_none());
    }
}
