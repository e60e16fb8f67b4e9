use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use globenews::{
    api::{ShutdownHandle, create_router},
    config::Config,
    processing::PipelineService,
};
use httpmock::{
    Method::{GET, POST},
    MockServer,
};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

const GEMINI_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn config(server: &MockServer, with_keys: bool) -> Config {
    Config {
        news_api_key: with_keys.then(|| "news-key".to_string()),
        news_api_base_url: server.base_url(),
        genai_api_key: with_keys.then(|| "genai-key".to_string()),
        genai_base_url: server.base_url(),
        genai_model: "gemini-test".into(),
        ..Config::default()
    }
}

fn app(config: &Config) -> Router {
    let pipeline = Arc::new(PipelineService::new(config).expect("pipeline"));
    create_router(pipeline, ShutdownHandle::new(Duration::ZERO))
}

async fn search(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/news/search-and-summarize")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
}

#[tokio::test]
async fn single_article_is_summarized_end_to_end() {
    let server = MockServer::start_async().await;
    let news = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("language", "en")
                .header("x-api-key", "news-key");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [{
                    "title": "Summit opens",
                    "description": "Leaders meet",
                    "content": "Long text",
                    "url": "u1",
                    "publishedAt": "2025-03-01T08:00:00Z",
                    "source": { "id": null, "name": "Wire" }
                }]
            }));
        })
        .await;
    let gemini = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GEMINI_PATH)
                .query_param("key", "genai-key")
                .body_contains("Summit opens");
            then.status(200).json_body(gemini_reply(
                r#"{"sameEvent": false, "summary": "S", "countries": ["USA"]}"#,
            ));
        })
        .await;

    let (status, body) = search(
        app(&config(&server, true)),
        json!({ "keywords": [], "languages": ["en"] }),
    )
    .await;

    news.assert_async().await;
    gemini.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "articles": [{
                "id": "u1",
                "title": "Summit opens",
                "url": "u1",
                "publishedAt": "2025-03-01T08:00:00Z",
                "source": "Wire",
                "language": "en",
                "summary": "S",
                "countries": ["USA"],
                "sameEvent": false
            }]
        })
    );
}

#[tokio::test]
async fn failing_language_does_not_fail_request() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("language", "fr");
            then.status(500).body("upstream down");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("language", "en");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [
                    { "title": "One", "url": "https://example.org/1" },
                    { "title": "One again", "url": "https://example.org/1" },
                    { "title": "Two", "url": "https://example.org/2" }
                ]
            }));
        })
        .await;
    let gemini = server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200).json_body(gemini_reply(
                r#"{"sameEvent": true, "summary": "X", "countries": ["FRA"]}"#,
            ));
        })
        .await;

    let (status, body) = search(
        app(&config(&server, true)),
        json!({
            "languages": ["fr", "en"],
            "existingArticles": { "https://example.org/1": { "summary": "Earlier" } }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let articles = body["articles"].as_array().expect("articles");
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0]["title"], "One");
    assert_eq!(articles[0]["language"], "en");
    assert_eq!(articles[0]["sameEvent"], true);
    assert_eq!(articles[0]["countries"], json!(["FRA"]));
    assert_eq!(articles[1]["id"], "https://example.org/2");
    gemini.assert_hits_async(2).await;
}

#[tokio::test]
async fn provider_error_falls_back_to_article_text() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [{ "title": "Title", "description": "Desc", "url": "u1" }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(429).body("quota exceeded");
        })
        .await;

    let (status, body) = search(app(&config(&server, true)), json!({ "languages": ["en"] })).await;

    assert_eq!(status, StatusCode::OK);
    let article = &body["articles"][0];
    assert_eq!(article["summary"], "Desc");
    assert_eq!(article["countries"], json!([]));
    assert_eq!(article["sameEvent"], false);
}

#[tokio::test]
async fn non_json_completion_is_returned_verbatim() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [{ "title": "Title", "url": "u1" }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200)
                .json_body(gemini_reply("The summit opened with a joint statement."));
        })
        .await;

    let (status, body) = search(app(&config(&server, true)), json!({ "languages": ["en"] })).await;

    assert_eq!(status, StatusCode::OK);
    let article = &body["articles"][0];
    assert_eq!(article["summary"], "The summit opened with a joint statement.");
    assert_eq!(article["countries"], json!([]));
}

#[tokio::test]
async fn malformed_provider_envelope_returns_generic_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(json!({
                "status": "ok",
                "articles": [{ "title": "Title", "url": "u1" }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GEMINI_PATH);
            then.status(200).body("not an envelope");
        })
        .await;

    let (status, body) = search(app(&config(&server, true)), json!({ "languages": ["en"] })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "internal error" }));
}

#[tokio::test]
async fn missing_credentials_yield_empty_result_without_network() {
    let server = MockServer::start_async().await;
    let news = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200).json_body(json!({ "articles": [] }));
        })
        .await;

    let (status, body) = search(app(&config(&server, false)), json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "articles": [] }));
    news.assert_hits_async(0).await;
}
