//! News search: query model, normalized article records, and the NewsAPI transport.

mod client;
mod types;

pub use client::NewsApiClient;
pub use types::{ArticleRecord, FetchQuery, NewsError};

use async_trait::async_trait;

/// Interface implemented by news search backends.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Search every requested language and return the concatenated article records.
    ///
    /// Per-language provider failures are absorbed; only transport-level failures are returned.
    async fn fetch_news(&self, query: &FetchQuery) -> Result<Vec<ArticleRecord>, NewsError>;
}
