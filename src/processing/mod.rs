//! Article pipeline: deduplication, summarization, and orchestration.

mod mappers;
pub mod sanitize;
mod service;
pub mod summarize;
pub mod types;

pub use mappers::dedupe_articles;
pub use service::{NewsPipeline, PipelineService};
pub use summarize::Summarizer;
pub use types::{
    EnrichedArticle, ExistingArticle, ExistingArticlesIndex, PipelineError, PipelineRequest,
    SummaryResult,
};
