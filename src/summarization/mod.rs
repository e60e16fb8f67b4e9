//! Transport for the generative-language provider used to summarize articles.
//!
//! The client only turns a prompt into completion text. Prompt construction, JSON parsing, and
//! fallback summaries live in the processing layer, which also decides which failures are
//! recoverable.

use crate::config::Config;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced while requesting a completion.
#[derive(Debug, Error)]
pub enum SummarizationClientError {
    /// HTTP layer failed before receiving a response.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Provider answered with a non-success status.
    #[error("Provider returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status returned by the provider.
        status: StatusCode,
        /// Body payload associated with the failing response.
        body: String,
    },
    /// Provider response envelope could not be decoded.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

impl SummarizationClientError {
    /// Whether the failure should be absorbed with a fallback summary.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. })
    }
}

/// Interface implemented by generative-language providers.
#[async_trait]
pub trait SummarizationClient: Send + Sync {
    /// Send a single free-text prompt and return the completion text.
    async fn generate_summary(&self, prompt: &str) -> Result<String, SummarizationClientError>;
}

/// Build a summarization client based on configuration.
///
/// Returns `Ok(None)` when no credential is configured, which callers treat as degraded mode.
pub fn get_summarization_client(
    config: &Config,
) -> Result<Option<Arc<dyn SummarizationClient>>, SummarizationClientError> {
    let Some(api_key) = config.genai_api_key.clone() else {
        return Ok(None);
    };
    let client = GeminiClient::new(
        config.genai_base_url.clone(),
        config.genai_model.clone(),
        api_key,
    )?;
    Ok(Some(Arc::new(client)))
}

/// Google Generative Language (`generateContent`) client.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Construct a client for `model` served under `base_url`.
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
    ) -> Result<Self, SummarizationClientError> {
        let http = Client::builder().user_agent("globenews/summary").build()?;
        tracing::debug!(url = %base_url, model = %model, "Initialized generative-language client");
        Ok(Self {
            http,
            base_url,
            model,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First part of the first candidate, else every part joined by a space, else empty.
    fn completion_text(&self) -> String {
        let Some(parts) = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
        else {
            return String::new();
        };

        if let Some(text) = parts
            .first()
            .and_then(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())
        {
            return text.to_string();
        }

        parts
            .iter()
            .map(|part| part.text.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SummarizationClient for GeminiClient {
    async fn generate_summary(&self, prompt: &str) -> Result<String, SummarizationClientError> {
        let payload = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ]
        });

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizationClientError::UnexpectedStatus { status, body });
        }

        let body: GenerateContentResponse = response.json().await.map_err(|error| {
            SummarizationClientError::InvalidResponse(format!(
                "failed to decode generateContent response: {error}"
            ))
        })?;

        Ok(body.completion_text())
    }
}
