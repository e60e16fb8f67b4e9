//! Mapping helpers for article records: deduplication and response assembly.

use crate::news::ArticleRecord;
use crate::processing::types::{EnrichedArticle, SummaryResult};
use std::collections::HashSet;

/// Collapse records to one per identifier, keeping the first occurrence in its original position.
///
/// Records without an identifier are dropped. Later duplicates are discarded, never merged.
pub fn dedupe_articles(articles: Vec<ArticleRecord>) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(articles.len());

    for article in articles {
        if article.id.is_empty() {
            continue;
        }
        if seen.insert(article.id.clone()) {
            unique.push(article);
        }
    }

    unique
}

/// Combine an article with its summary into the response shape.
pub(crate) fn enrich_article(article: ArticleRecord, summary: SummaryResult) -> EnrichedArticle {
    let ArticleRecord {
        id,
        title,
        url,
        published_at,
        source,
        language,
        ..
    } = article;

    EnrichedArticle {
        id,
        title,
        url,
        published_at,
        source,
        language,
        summary: summary.summary,
        countries: summary.countries,
        same_event: summary.same_event,
    }
}
