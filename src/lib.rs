#![deny(missing_docs)]

//! Core library for the globenews search-and-summarize proxy.

/// HTTP routing and handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// News search provider integration.
pub mod news;
/// Article pipeline: dedupe, summarize, assemble.
pub mod processing;
/// Generative-language provider integration.
pub mod summarization;
