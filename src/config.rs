use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default NewsAPI endpoint root.
pub const DEFAULT_NEWSAPI_BASE_URL: &str = "https://newsapi.org";
/// Default Google Generative Language endpoint root.
pub const DEFAULT_GENAI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default generative model identifier.
pub const DEFAULT_GENAI_MODEL: &str = "gemini-1.5-flash";
/// Default language summaries are written in.
pub const DEFAULT_SUMMARY_LANGUAGE: &str = "French";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the news proxy.
///
/// Built once at startup and handed to each component by value; missing credentials are a
/// valid state that switches the corresponding component into degraded mode.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential for the news search provider.
    pub news_api_key: Option<String>,
    /// Base URL of the news search provider.
    pub news_api_base_url: String,
    /// Credential for the generative-language provider.
    pub genai_api_key: Option<String>,
    /// Base URL of the generative-language provider.
    pub genai_base_url: String,
    /// Model used for `generateContent` calls.
    pub genai_model: String,
    /// Human language requested for generated summaries.
    pub summary_language: String,
    /// Upper bound on concurrent summarization calls per request.
    pub summary_concurrency: usize,
    /// Delay between acknowledging a shutdown request and stopping the server.
    pub shutdown_delay: Duration,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            news_api_key: None,
            news_api_base_url: DEFAULT_NEWSAPI_BASE_URL.to_string(),
            genai_api_key: None,
            genai_base_url: DEFAULT_GENAI_BASE_URL.to_string(),
            genai_model: DEFAULT_GENAI_MODEL.to_string(),
            summary_language: DEFAULT_SUMMARY_LANGUAGE.to_string(),
            summary_concurrency: 1,
            shutdown_delay: Duration::from_millis(100),
            server_port: None,
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset so that an empty `.env` entry does not count as a
    /// configured credential.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let summary_concurrency = match get("SUMMARY_CONCURRENCY") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(parsed) if parsed > 0 => parsed,
                _ => return Err(ConfigError::InvalidValue("SUMMARY_CONCURRENCY".into())),
            },
            None => defaults.summary_concurrency,
        };

        let shutdown_delay = get("SHUTDOWN_DELAY_MS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::InvalidValue("SHUTDOWN_DELAY_MS".into()))
            })
            .transpose()?
            .unwrap_or(defaults.shutdown_delay);

        let server_port = match (get("SERVER_PORT"), get("PORT")) {
            (Some(value), _) => Some(parse_port("SERVER_PORT", &value)?),
            (None, Some(value)) => Some(parse_port("PORT", &value)?),
            (None, None) => None,
        };

        Ok(Self {
            news_api_key: get("NEWSAPI_API_KEY").map(|value| value.trim().to_string()),
            news_api_base_url: get("NEWSAPI_BASE_URL").unwrap_or(defaults.news_api_base_url),
            genai_api_key: get("GOOGLE_GENAI_API_KEY").map(|value| value.trim().to_string()),
            genai_base_url: get("GENAI_BASE_URL").unwrap_or(defaults.genai_base_url),
            genai_model: get("GENAI_MODEL").unwrap_or(defaults.genai_model),
            summary_language: get("SUMMARY_LANGUAGE").unwrap_or(defaults.summary_language),
            summary_concurrency,
            shutdown_delay,
            server_port,
        })
    }
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(key.into()))
}

/// Build the configuration from the environment and report degraded components.
///
/// Callers load `.env` through `dotenvy` beforehand so file-provided values are visible here.
pub fn load_config() -> Result<Config, ConfigError> {
    let config = Config::from_env()?;

    if config.news_api_key.is_none() {
        tracing::warn!("NEWSAPI_API_KEY is not set; article searches will return no results");
    }
    if config.genai_api_key.is_none() {
        tracing::warn!("GOOGLE_GENAI_API_KEY is not set; summaries fall back to article text");
    }
    tracing::debug!(
        news_api = %config.news_api_base_url,
        genai = %config.genai_base_url,
        model = %config.genai_model,
        summary_concurrency = config.summary_concurrency,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    Ok(config)
}
