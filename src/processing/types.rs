//! Core data types and error definitions for the article pipeline.

use crate::{news::NewsError, summarization::SummarizationClientError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that abort a pipeline run as a whole.
///
/// Recoverable provider failures are absorbed before they reach this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// News search failed at the transport level.
    #[error("News search failed: {0}")]
    News(#[from] NewsError),
    /// Summarization failed in a way that has no fallback.
    #[error("Summarization failed: {0}")]
    Summarization(#[from] SummarizationClientError),
}

/// Previously stored summary supplied by the caller for a given article id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExistingArticle {
    /// Summary text produced by an earlier run.
    #[serde(default)]
    pub summary: Option<String>,
}

/// Caller-supplied mapping from article id to its earlier summary.
pub type ExistingArticlesIndex = HashMap<String, ExistingArticle>;

/// Parameters for one search-and-summarize run.
#[derive(Debug, Clone, Default)]
pub struct PipelineRequest {
    /// Inclusive lower bound on publication time.
    pub since: Option<String>,
    /// Languages searched, one provider request each.
    pub languages: Vec<String>,
    /// Keywords OR-ed into the search expression.
    pub keywords: Vec<String>,
    /// Page size used for every provider request.
    pub max_results: u32,
    /// Earlier summaries keyed by article id.
    pub existing_articles: ExistingArticlesIndex,
}

/// Structured summarizer output for a single article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    /// Whether the article describes the same event as the supplied earlier summary.
    pub same_event: bool,
    /// Fused or fresh summary text; never empty.
    pub summary: String,
    /// ISO 3166-1 alpha-3 codes of the countries directly concerned.
    pub countries: Vec<String>,
}

/// Response unit: one per unique article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedArticle {
    /// Article identifier (URL or title).
    pub id: String,
    /// Headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Canonical article URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// ISO-8601 publication timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Publisher name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Language of the query that found the article.
    pub language: String,
    /// Final summary text.
    pub summary: String,
    /// ISO 3166-1 alpha-3 codes of concerned countries.
    pub countries: Vec<String>,
    /// Same-event flag reported by the summarizer.
    pub same_event: bool,
}
