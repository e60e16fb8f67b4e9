use globenews::{
    config::Config,
    processing::{PipelineRequest, PipelineService},
};
use std::collections::HashMap;

fn live_config() -> Config {
    dotenvy::dotenv().ok();
    Config::from_env().expect("configuration")
}

#[tokio::test]
#[ignore = "Requires NEWSAPI_API_KEY and network access"]
async fn live_news_search_returns_articles() {
    let config = live_config();
    assert!(config.news_api_key.is_some(), "NEWSAPI_API_KEY must be set");
    let service = PipelineService::with_components(
        std::sync::Arc::new(globenews::news::NewsApiClient::new(&config).expect("client")),
        globenews::processing::Summarizer::new(None, config.summary_language.clone()),
        1,
    );

    let articles = service
        .run(PipelineRequest {
            since: None,
            languages: vec!["en".into()],
            keywords: vec!["economy".into()],
            max_results: 5,
            existing_articles: HashMap::new(),
        })
        .await
        .expect("live search");
    assert!(!articles.is_empty(), "expected at least one article");
    assert!(articles.iter().all(|article| !article.summary.is_empty()));
}

#[tokio::test]
#[ignore = "Requires NEWSAPI_API_KEY, GOOGLE_GENAI_API_KEY and network access"]
async fn live_pipeline_tags_countries() {
    let config = live_config();
    assert!(config.genai_api_key.is_some(), "GOOGLE_GENAI_API_KEY must be set");
    let service = PipelineService::new(&config).expect("pipeline");

    let articles = service
        .run(PipelineRequest {
            since: None,
            languages: vec!["fr".into()],
            keywords: vec!["politique".into()],
            max_results: 2,
            existing_articles: HashMap::new(),
        })
        .await
        .expect("live pipeline");
    for article in &articles {
        assert!(
            article.countries.iter().all(|code| code.len() == 3),
            "unexpected country codes: {:?}",
            article.countries
        );
    }
}
