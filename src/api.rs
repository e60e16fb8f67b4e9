//! HTTP surface for globenews.
//!
//! - `POST /api/news/search-and-summarize` – Search recent articles in each requested language,
//!   deduplicate them, and return one AI summary per article together with the ISO 3166-1
//!   alpha-3 codes of the countries it concerns. Every body field is optional:
//!   `since`, `languages` (default `["fr","en"]`), `keywords` (default
//!   `["politique","économique"]`), `maxResults` (default 40), and `existingArticles`
//!   (`{ id: { summary } }`, used to fuse follow-up coverage of one event).
//! - `POST /api/shutdown` – Acknowledge with `{ "ok": true }` and stop the server after a
//!   short drain delay.
//!
//! A permissive CORS layer lets the browser map front-end call the API from another origin.

use crate::processing::{
    EnrichedArticle, ExistingArticlesIndex, NewsPipeline, PipelineError, PipelineRequest,
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;

const DEFAULT_LANGUAGES: [&str; 2] = ["fr", "en"];
const DEFAULT_KEYWORDS: [&str; 2] = ["politique", "économique"];
const DEFAULT_MAX_RESULTS: u32 = 40;

/// Signals the server to stop once a client has asked for shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    notify: Arc<Notify>,
    delay: Duration,
}

impl ShutdownHandle {
    /// Create a handle that fires `delay` after [`ShutdownHandle::trigger`] is called.
    pub fn new(delay: Duration) -> Self {
        Self {
            notify: Arc::new(Notify::new()),
            delay,
        }
    }

    /// Schedule shutdown after the drain delay without blocking the caller.
    pub fn trigger(&self) {
        let notify = Arc::clone(&self.notify);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notify.notify_one();
        });
    }

    /// Resolve once shutdown has been triggered and the delay has elapsed.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

struct AppState<S> {
    pipeline: Arc<S>,
    shutdown: ShutdownHandle,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Build the HTTP router exposing the search-and-summarize API.
pub fn create_router<S>(pipeline: Arc<S>, shutdown: ShutdownHandle) -> Router
where
    S: NewsPipeline + 'static,
{
    Router::new()
        .route(
            "/api/news/search-and-summarize",
            post(search_and_summarize::<S>),
        )
        .route("/api/shutdown", post(shutdown_server::<S>))
        .layer(CorsLayer::permissive())
        .with_state(AppState { pipeline, shutdown })
}

/// Request body for `POST /api/news/search-and-summarize`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    /// Inclusive ISO-8601 lower bound; defaults to 24 hours ago.
    since: Option<String>,
    /// Languages to search.
    languages: Option<Vec<String>>,
    /// Keywords OR-ed together.
    keywords: Option<Vec<String>>,
    /// Page size for each provider request.
    max_results: Option<u32>,
    /// Earlier summaries keyed by article id.
    existing_articles: Option<ExistingArticlesIndex>,
}

impl SearchRequest {
    fn into_pipeline_request(self) -> PipelineRequest {
        PipelineRequest {
            since: self.since,
            languages: self
                .languages
                .unwrap_or_else(|| Vec::from(DEFAULT_LANGUAGES.map(String::from))),
            keywords: self
                .keywords
                .unwrap_or_else(|| Vec::from(DEFAULT_KEYWORDS.map(String::from))),
            max_results: self.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            existing_articles: self.existing_articles.unwrap_or_default(),
        }
    }
}

/// An empty or `null` body means "all defaults".
fn parse_search_request(body: &[u8]) -> Result<SearchRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SearchRequest::default());
    }
    serde_json::from_slice::<Option<SearchRequest>>(body)
        .map(Option::unwrap_or_default)
        .map_err(|error| AppError::BadRequest(format!("Invalid request body: {error}")))
}

/// Success response for `POST /api/news/search-and-summarize`.
#[derive(Serialize)]
struct SearchResponse {
    articles: Vec<EnrichedArticle>,
}

/// Run the full search, dedupe, and summarize pipeline for one request.
async fn search_and_summarize<S>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, AppError>
where
    S: NewsPipeline,
{
    let request = parse_search_request(&body)?.into_pipeline_request();
    let articles = state.pipeline.search_and_summarize(request).await?;
    tracing::info!(articles = articles.len(), "Search-and-summarize request completed");
    Ok(Json(SearchResponse { articles }))
}

/// Response body for `POST /api/shutdown`.
#[derive(Serialize)]
struct ShutdownResponse {
    ok: bool,
}

/// Acknowledge the request, then let the server drain and stop.
async fn shutdown_server<S>(State(state): State<AppState<S>>) -> Json<ShutdownResponse>
where
    S: NewsPipeline,
{
    tracing::info!("Shutdown requested by client");
    state.shutdown.trigger();
    Json(ShutdownResponse { ok: true })
}

enum AppError {
    BadRequest(String),
    Pipeline(PipelineError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Pipeline(error) => {
                tracing::error!(error = %error, "Search-and-summarize request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(inner: PipelineError) -> Self {
        Self::Pipeline(inner)
    }
}
