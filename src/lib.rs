//! Docglean: a documentation and glossary content harvester
//!
//! This crate crawls a documentation site and a glossary site, extracts the
//! readable article content and glossary term definitions, normalizes HTML to
//! markdown, and persists the results into a relational store. Embeddings for
//! the persisted rows are generated by a separate downstream process.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod markdown;
pub mod storage;

use thiserror::Error;

/// Main error type for Docglean operations
///
/// Only fatal conditions surface here: configuration problems, a store that
/// cannot be opened, or a discovery source that cannot be fetched. Per-item
/// failures during a crawl are captured in [`crawler::ItemOutcome`] and never
/// escape the processing loop.
#[derive(Debug, Error)]
pub enum GleanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("Discovery failed for {source_url}: {message}")]
    Discovery { source_url: String, message: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
}

/// Result type alias for Docglean operations
pub type Result<T> = std::result::Result<T, GleanError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlMode, RunSummary};
