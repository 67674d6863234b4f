//! Documentation crawl orchestrator
//!
//! Discovers page URLs from the site's sitemap, then processes them
//! sequentially: existence check, rate-limited fetch, readability
//! extraction, markdown normalization, and insert. Already-persisted URLs
//! are skipped untouched.

use crate::config::Config;
use crate::crawler::{
    build_http_client, filter_docs_urls, sitemap_locations, ItemError, ItemOutcome, PageFetcher,
    RateLimiter, RunSummary, DOCS_ITEM_DELAY_MS, DOCS_REQUESTS_PER_MINUTE,
};
use crate::extract::{extract_article, ExtractOptions};
use crate::markdown::{estimate_tokens, to_markdown};
use crate::storage::{SqliteStore, Store};
use crate::{GleanError, Result};
use std::time::Duration;

/// Orchestrates a docs crawl run
pub struct DocsCrawler {
    fetcher: PageFetcher,
    limiter: RateLimiter,
    store: SqliteStore,
    options: ExtractOptions,
    sitemap_url: String,
    item_delay: Duration,
    requests: usize,
}

impl DocsCrawler {
    /// Creates a docs crawler from the configuration and an open store
    pub fn new(config: &Config, store: SqliteStore) -> Result<Self> {
        let client = build_http_client()?;
        let rpm = config
            .crawl
            .requests_per_minute
            .unwrap_or(DOCS_REQUESTS_PER_MINUTE);
        let delay_ms = config
            .crawl
            .delay_between_items
            .unwrap_or(DOCS_ITEM_DELAY_MS);
        let options = config
            .crawl
            .char_threshold
            .map(ExtractOptions::with_char_threshold)
            .unwrap_or_default();

        Ok(Self {
            fetcher: PageFetcher::new(client, config.site.allowed_domain.clone()),
            limiter: RateLimiter::new(rpm),
            store,
            options,
            sitemap_url: config.site.resolved_sitemap_url(),
            item_delay: Duration::from_millis(delay_ms),
            requests: 0,
        })
    }

    /// Runs the crawl to completion
    ///
    /// A sitemap that cannot be fetched is fatal; everything after discovery
    /// is per-item and survives individual failures.
    pub async fn run(&mut self) -> Result<RunSummary> {
        tracing::info!("Starting docs crawl");

        let urls = self.discover().await?;
        let mut summary = RunSummary {
            total: urls.len(),
            ..RunSummary::default()
        };

        if urls.is_empty() {
            tracing::info!("No documentation URLs found in sitemap");
            return Ok(summary);
        }

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("Processing URL {}/{}: {}", index + 1, urls.len(), url);

            let outcome = self.process_url(url).await;
            match &outcome {
                ItemOutcome::Saved => tracing::info!("Saved content for {}", url),
                ItemOutcome::Skipped => {
                    tracing::info!("URL {} already persisted, skipping", url)
                }
                ItemOutcome::Failed(e) => tracing::warn!("Failed to process {}: {}", url, e),
            }
            summary.record(&outcome);

            // Politeness padding between items, independent of the limiter
            tokio::time::sleep(self.item_delay).await;
        }

        summary.requests = self.requests;
        tracing::info!(
            "Docs crawl completed: {}/{} succeeded ({} saved, {} skipped, {} failed, {} requests)",
            summary.succeeded(),
            summary.total,
            summary.saved,
            summary.skipped,
            summary.failed,
            summary.requests
        );
        tracing::info!(
            "Store now holds {} documents",
            self.store.count_documents().unwrap_or_default()
        );

        Ok(summary)
    }

    /// Fetches the sitemap and extracts documentation URLs
    async fn discover(&mut self) -> Result<Vec<String>> {
        tracing::info!("Fetching sitemap from {}", self.sitemap_url);
        self.requests += 1;

        let body = self.fetcher.fetch(&self.sitemap_url).await.ok_or_else(|| {
            GleanError::Discovery {
                source_url: self.sitemap_url.clone(),
                message: "failed to fetch sitemap".to_string(),
            }
        })?;

        let urls = filter_docs_urls(sitemap_locations(&body));
        tracing::info!("Found {} documentation URLs in sitemap", urls.len());
        Ok(urls)
    }

    /// Processes a single URL; failures are captured, never propagated
    async fn process_url(&mut self, url: &str) -> ItemOutcome {
        // Existing rows are left untouched: skip before spending a request
        match self.store.document_exists(url) {
            Ok(true) => return ItemOutcome::Skipped,
            Ok(false) => {}
            Err(e) => return ItemOutcome::Failed(ItemError::Persist(e.to_string())),
        }

        self.limiter.acquire().await;
        self.requests += 1;

        let Some(html) = self.fetcher.fetch(url).await else {
            return ItemOutcome::Failed(ItemError::Fetch(
                "failed to fetch page content".to_string(),
            ));
        };

        let article = extract_article(&html, &self.options);
        if article.is_empty() {
            return ItemOutcome::Failed(ItemError::Extract(
                "no readable content cleared the threshold".to_string(),
            ));
        }

        let content = to_markdown(&article);
        if content.is_empty() {
            return ItemOutcome::Failed(ItemError::Extract(
                "normalized output was empty".to_string(),
            ));
        }

        let token_count = estimate_tokens(&content);
        match self.store.insert_document(url, &content, token_count) {
            Ok(_) => ItemOutcome::Saved,
            Err(e) => ItemOutcome::Failed(ItemError::Persist(e.to_string())),
        }
    }
}
