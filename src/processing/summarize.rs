//! Per-article summarization: prompt construction, completion parsing, and fallback summaries.

use crate::news::ArticleRecord;
use crate::processing::sanitize::first_non_blank;
use crate::processing::types::SummaryResult;
use crate::summarization::{SummarizationClient, SummarizationClientError};
use serde_json::Value;
use std::sync::Arc;

/// Placeholder used when no AI credential is configured and the article has no text.
pub const MISSING_KEY_PLACEHOLDER: &str = "Summary unavailable (missing AI key)";
/// Placeholder used when the provider rejected the request and the article has no text.
pub const PROVIDER_ERROR_PLACEHOLDER: &str = "Summary unavailable (AI error)";
/// Placeholder used when the completion carried no usable summary.
pub const EMPTY_SUMMARY_PLACEHOLDER: &str = "Summary unavailable";

/// Produces a [`SummaryResult`] per article, delegating to a provider when one is configured.
#[derive(Clone)]
pub struct Summarizer {
    client: Option<Arc<dyn SummarizationClient>>,
    language: String,
}

impl Summarizer {
    /// Build a summarizer; `None` selects degraded mode.
    pub fn new(client: Option<Arc<dyn SummarizationClient>>, language: impl Into<String>) -> Self {
        Self {
            client,
            language: language.into(),
        }
    }

    /// Whether a provider is configured.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Summarize `article`, fusing it with `existing_summary` when the provider judges them to
    /// describe one event.
    ///
    /// Provider status failures and unparseable completions yield fallback results; transport
    /// failures are returned to the caller.
    pub async fn summarize(
        &self,
        article: &ArticleRecord,
        existing_summary: Option<&str>,
    ) -> Result<SummaryResult, SummarizationClientError> {
        let Some(client) = self.client.as_ref() else {
            return Ok(fallback_result(
                article,
                existing_summary,
                MISSING_KEY_PLACEHOLDER,
            ));
        };

        let prompt = build_summary_prompt(article, existing_summary, &self.language);
        match client.generate_summary(&prompt).await {
            Ok(text) => Ok(parse_completion(&text, existing_summary)),
            Err(error) if error.is_recoverable() => {
                tracing::error!(
                    article_id = %article.id,
                    error = %error,
                    "Summarization request failed; using article text"
                );
                Ok(fallback_result(
                    article,
                    existing_summary,
                    PROVIDER_ERROR_PLACEHOLDER,
                ))
            }
            Err(error) => Err(error),
        }
    }
}

/// Result used whenever the provider cannot be consulted.
fn fallback_result(
    article: &ArticleRecord,
    existing_summary: Option<&str>,
    placeholder: &str,
) -> SummaryResult {
    let summary = first_non_blank([
        existing_summary,
        article.description.as_deref(),
        article.title.as_deref(),
    ])
    .unwrap_or(placeholder)
    .to_string();

    SummaryResult {
        same_event: false,
        summary,
        countries: Vec::new(),
    }
}

/// Build the instruction prompt sent to the provider.
pub(crate) fn build_summary_prompt(
    article: &ArticleRecord,
    existing_summary: Option<&str>,
    language: &str,
) -> String {
    let title = first_non_blank([article.title.as_deref()]).unwrap_or("(untitled)");
    let description = first_non_blank([article.description.as_deref()]).unwrap_or("(none)");
    let content = first_non_blank([article.content.as_deref()]).unwrap_or("(no content)");
    let existing = first_non_blank([existing_summary]).unwrap_or("(none)");

    let mut prompt = String::new();
    prompt.push_str(&format!(
        "You are an assistant that summarizes news articles in {language}.\n\n"
    ));
    prompt.push_str("Article:\n");
    prompt.push_str(&format!("Title: {title}\n"));
    prompt.push_str(&format!("Description: {description}\n"));
    prompt.push_str(&format!("Raw content: {content}\n\n"));
    prompt.push_str(&format!("Existing summary (may be empty): {existing}\n\n"));
    prompt.push_str("Task:\n");
    prompt.push_str(
        "1. If the new text describes the same event as the existing summary, merge the information and produce a single new summary.\n",
    );
    prompt.push_str("2. Otherwise, simply summarize the new article.\n");
    prompt.push_str(
        "3. Identify the countries directly concerned by the article and return their ISO 3166-1 alpha-3 codes.\n\n",
    );
    prompt.push_str("Answer STRICTLY in JSON with the shape:\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"sameEvent\": true|false,\n");
    prompt.push_str(&format!("  \"summary\": \"summary text in {language}\",\n"));
    prompt.push_str("  \"countries\": [\"FRA\", \"USA\", ...]\n");
    prompt.push('}');
    prompt
}

/// Interpret completion text as `{sameEvent, summary, countries}`.
///
/// Unparseable text becomes the summary itself, falling back to the earlier summary and then a
/// placeholder.
pub(crate) fn parse_completion(text: &str, existing_summary: Option<&str>) -> SummaryResult {
    match serde_json::from_str::<Value>(strip_code_fence(text)) {
        Ok(parsed) if !parsed.is_null() => coerce_summary(&parsed),
        _ => {
            tracing::warn!(completion = %text, "Completion is not valid JSON; using raw text");
            let summary = [Some(text), existing_summary]
                .into_iter()
                .flatten()
                .find(|value| !value.is_empty())
                .unwrap_or(EMPTY_SUMMARY_PLACEHOLDER)
                .to_string();
            SummaryResult {
                same_event: false,
                summary,
                countries: Vec::new(),
            }
        }
    }
}

fn coerce_summary(parsed: &Value) -> SummaryResult {
    let same_event = parsed.get("sameEvent").is_some_and(is_truthy);

    let summary = match parsed.get("summary") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(value) if is_truthy(value) => value.to_string(),
        _ => EMPTY_SUMMARY_PLACEHOLDER.to_string(),
    };

    let countries = match parsed.get("countries") {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    SummaryResult {
        same_event,
        summary,
        countries,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Remove a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````), if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    let body = body.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    body.trim()
}
