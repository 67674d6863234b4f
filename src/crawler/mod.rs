//! Crawler module for page fetching and processing
//!
//! This module contains the two crawl orchestrators and their shared parts:
//! - HTTP fetching with URL allowlisting
//! - Rate limiting and politeness delays
//! - URL discovery (sitemap scan, glossary index)
//! - Sequential per-item processing with partial-failure handling

mod discovery;
mod docs;
mod fetcher;
mod glossary;
mod rate_limit;

pub use discovery::{filter_docs_urls, glossary_links, sitemap_locations};
pub use docs::DocsCrawler;
pub use fetcher::{build_http_client, PageFetcher};
pub use glossary::GlossaryCrawler;
pub use rate_limit::RateLimiter;

use crate::config::Config;
use crate::storage::SqliteStore;
use crate::{GleanError, Result};
use thiserror::Error;

/// Default fetch rate for the docs crawl
pub const DOCS_REQUESTS_PER_MINUTE: u32 = 50;

/// Default fetch rate for the glossary crawl
pub const GLOSSARY_REQUESTS_PER_MINUTE: u32 = 30;

/// Default pause after each processed docs item, in milliseconds
pub const DOCS_ITEM_DELAY_MS: u64 = 1000;

/// Default pause after each processed glossary item, in milliseconds
pub const GLOSSARY_ITEM_DELAY_MS: u64 = 2000;

/// Which crawl variant to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    Docs,
    Glossary,
}

impl std::fmt::Display for CrawlMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrawlMode::Docs => write!(f, "docs"),
            CrawlMode::Glossary => write!(f, "glossary"),
        }
    }
}

/// Per-item failure categories
///
/// These differ by message only; all three are recorded and the run
/// continues.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("extraction failed: {0}")]
    Extract(String),

    #[error("persistence failed: {0}")]
    Persist(String),
}

/// Outcome of processing a single discovered item
#[derive(Debug)]
pub enum ItemOutcome {
    /// Content was extracted and persisted
    Saved,
    /// The item already existed and was left untouched
    Skipped,
    /// Processing failed; the error never escapes the loop
    Failed(ItemError),
}

/// Aggregated counts for a completed crawl run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Number of discovered items
    pub total: usize,
    /// Items persisted this run
    pub saved: usize,
    /// Items skipped because they were already persisted
    pub skipped: usize,
    /// Items that failed to fetch, extract, or persist
    pub failed: usize,
    /// Network requests issued
    pub requests: usize,
}

impl RunSummary {
    /// Items that count as successful: saved plus skipped
    pub fn succeeded(&self) -> usize {
        self.saved + self.skipped
    }

    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Saved => self.saved += 1,
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Runs the selected crawl variant to completion
///
/// Opens the store first so a connection-level failure aborts before any
/// network traffic; the connection is released when the crawler is dropped,
/// on success and failure alike.
pub async fn run(mode: CrawlMode, config: Config) -> Result<RunSummary> {
    let store = SqliteStore::open(&config.store.database_url).map_err(GleanError::Store)?;
    tracing::info!("Connected to store ({})", config.store.database_url);

    match mode {
        CrawlMode::Docs => DocsCrawler::new(&config, store)?.run().await,
        CrawlMode::Glossary => GlossaryCrawler::new(&config, store)?.run().await,
    }
}
