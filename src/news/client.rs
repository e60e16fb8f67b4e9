//! HTTP client for the NewsAPI `everything` search endpoint.

use crate::config::Config;
use crate::news::NewsSource;
use crate::news::types::{ArticleRecord, EverythingResponse, FetchQuery, NewsError};
use async_trait::async_trait;
use reqwest::Client;
use time::{Duration, OffsetDateTime, format_description::well_known::Rfc3339};

/// Lightweight HTTP client for NewsAPI searches.
pub struct NewsApiClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
}

impl NewsApiClient {
    /// Construct a client from the supplied configuration.
    ///
    /// A missing API key is accepted; searches then return no articles.
    pub fn new(config: &Config) -> Result<Self, NewsError> {
        let http = Client::builder().user_agent("globenews/news").build()?;
        tracing::debug!(
            url = %config.news_api_base_url,
            has_api_key = config.news_api_key.is_some(),
            "Initialized NewsAPI HTTP client"
        );
        Ok(Self {
            http,
            base_url: config.news_api_base_url.clone(),
            api_key: config.news_api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v2/everything", self.base_url.trim_end_matches('/'))
    }

    async fn fetch_language(
        &self,
        api_key: &str,
        language: &str,
        terms: &str,
        from: &str,
        page_size: u32,
    ) -> Result<Vec<ArticleRecord>, NewsError> {
        let mut params = Vec::with_capacity(5);
        if !terms.is_empty() {
            params.push(("q", terms.to_string()));
        }
        params.push(("language", language.to_string()));
        params.push(("from", from.to_string()));
        params.push(("sortBy", "publishedAt".to_string()));
        params.push(("pageSize", page_size.to_string()));

        let response = self
            .http
            .get(self.endpoint())
            .header("X-Api-Key", api_key)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(language, %status, body = %body, "News search failed; skipping language");
            return Ok(Vec::new());
        }

        let payload: EverythingResponse = response.json().await?;
        let records: Vec<ArticleRecord> = payload
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(|raw| raw.into_record(language))
            .collect();
        tracing::debug!(language, count = records.len(), "Fetched articles");
        Ok(records)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn fetch_news(&self, query: &FetchQuery) -> Result<Vec<ArticleRecord>, NewsError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!("No news API key configured; returning no articles");
            return Ok(Vec::new());
        };

        let terms = query.search_terms();
        let from = match query.since.as_deref().filter(|value| !value.is_empty()) {
            Some(since) => since.to_string(),
            None => default_since(OffsetDateTime::now_utc())?,
        };

        let mut articles = Vec::new();
        for language in &query.languages {
            let batch = self
                .fetch_language(api_key, language, &terms, &from, query.page_size)
                .await?;
            articles.extend(batch);
        }
        Ok(articles)
    }
}

/// Start of the default search window: 24 hours before `now`, truncated to whole seconds.
pub(crate) fn default_since(now: OffsetDateTime) -> Result<String, NewsError> {
    let start = now - Duration::hours(24);
    let start = start.replace_nanosecond(0).unwrap_or(start);
    Ok(start.format(&Rfc3339)?)
}
