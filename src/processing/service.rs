//! Pipeline service coordinating news search, deduplication, and summarization.

use crate::{
    config::Config,
    news::{FetchQuery, NewsApiClient, NewsSource},
    processing::{
        mappers::{dedupe_articles, enrich_article},
        sanitize::{sanitize_keywords, sanitize_languages, sanitize_string},
        summarize::Summarizer,
        types::{EnrichedArticle, PipelineError, PipelineRequest},
    },
    summarization::get_summarization_client,
};
use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt, stream};
use std::sync::Arc;

/// Runs the fetch → dedupe → summarize → assemble pipeline.
///
/// The service holds no per-request state; concurrent requests share it through an `Arc`.
pub struct PipelineService {
    news: Arc<dyn NewsSource>,
    summarizer: Summarizer,
    concurrency: usize,
}

/// Abstraction over the pipeline used by the HTTP surface.
#[async_trait]
pub trait NewsPipeline: Send + Sync {
    /// Search, deduplicate, and summarize articles for one request.
    async fn search_and_summarize(
        &self,
        request: PipelineRequest,
    ) -> Result<Vec<EnrichedArticle>, PipelineError>;
}

impl PipelineService {
    /// Build the service and its provider clients from configuration.
    pub fn new(config: &Config) -> Result<Self, PipelineError> {
        let news = Arc::new(NewsApiClient::new(config)?);
        let client = get_summarization_client(config)?;
        let summarizer = Summarizer::new(client, config.summary_language.clone());
        tracing::info!(
            news_enabled = config.news_api_key.is_some(),
            summaries_enabled = summarizer.is_enabled(),
            concurrency = config.summary_concurrency,
            "Pipeline initialized"
        );
        Ok(Self::with_components(
            news,
            summarizer,
            config.summary_concurrency,
        ))
    }

    /// Assemble a service from explicit components.
    ///
    /// `concurrency` bounds in-flight summarization calls; values below one are raised to one.
    pub fn with_components(
        news: Arc<dyn NewsSource>,
        summarizer: Summarizer,
        concurrency: usize,
    ) -> Self {
        Self {
            news,
            summarizer,
            concurrency: concurrency.max(1),
        }
    }

    /// Execute one pipeline run.
    ///
    /// Output order follows the deduplicated fetch order regardless of concurrency. Any
    /// unrecoverable failure aborts the whole run.
    pub async fn run(
        &self,
        request: PipelineRequest,
    ) -> Result<Vec<EnrichedArticle>, PipelineError> {
        let PipelineRequest {
            since,
            languages,
            keywords,
            max_results,
            existing_articles,
        } = request;

        let query = FetchQuery {
            since: sanitize_string(since),
            languages: sanitize_languages(languages),
            keywords: sanitize_keywords(keywords),
            page_size: max_results,
        };
        tracing::info!(
            languages = ?query.languages,
            keywords = ?query.keywords,
            page_size = query.page_size,
            "Searching news"
        );

        let fetched = self.news.fetch_news(&query).await?;
        let fetched_count = fetched.len();
        let unique = dedupe_articles(fetched);
        tracing::debug!(
            fetched = fetched_count,
            unique = unique.len(),
            "Deduplicated articles"
        );

        let summarizer = &self.summarizer;
        let existing = &existing_articles;
        let articles: Vec<EnrichedArticle> = stream::iter(unique)
            .map(|article| async move {
                let existing_summary = existing
                    .get(&article.id)
                    .and_then(|entry| entry.summary.as_deref());
                let summary = summarizer.summarize(&article, existing_summary).await?;
                Ok::<_, PipelineError>(enrich_article(article, summary))
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        tracing::info!(count = articles.len(), "Summarized articles");
        Ok(articles)
    }
}

#[async_trait]
impl NewsPipeline for PipelineService {
    async fn search_and_summarize(
        &self,
        request: PipelineRequest,
    ) -> Result<Vec<EnrichedArticle>, PipelineError> {
        self.run(request).await
    }
}
