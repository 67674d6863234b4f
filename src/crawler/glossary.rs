//! Glossary crawl orchestrator
//!
//! Discovers term URLs from the glossary index page, then processes them
//! sequentially: keyword derivation, rate-limited fetch, definition and
//! synonym extraction, and upsert. Unlike documents, existing keyword rows
//! are refreshed on re-crawl.

use crate::config::Config;
use crate::crawler::{
    build_http_client, glossary_links, ItemError, ItemOutcome, PageFetcher, RateLimiter,
    RunSummary, GLOSSARY_ITEM_DELAY_MS, GLOSSARY_REQUESTS_PER_MINUTE,
};
use crate::extract::{derive_keyword, extract_definition, extract_synonyms, HtmlNode};
use crate::storage::{KeywordUpsert, SqliteStore, Store};
use crate::{GleanError, Result};
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Category tag stamped on rows produced by this crawl
const GLOSSARY_CATEGORY: &str = "Glossary";

/// Orchestrates a glossary crawl run
pub struct GlossaryCrawler {
    fetcher: PageFetcher,
    limiter: RateLimiter,
    store: SqliteStore,
    index_url: String,
    base_url: Url,
    item_delay: Duration,
    requests: usize,
}

impl GlossaryCrawler {
    /// Creates a glossary crawler from the configuration and an open store
    pub fn new(config: &Config, store: SqliteStore) -> Result<Self> {
        let client = build_http_client()?;
        let rpm = config
            .crawl
            .requests_per_minute
            .unwrap_or(GLOSSARY_REQUESTS_PER_MINUTE);
        let delay_ms = config
            .crawl
            .delay_between_items
            .unwrap_or(GLOSSARY_ITEM_DELAY_MS);
        let base_url = Url::parse(&config.site.base_url)?;

        Ok(Self {
            fetcher: PageFetcher::new(client, config.site.allowed_domain.clone()),
            limiter: RateLimiter::new(rpm),
            store,
            index_url: config.site.resolved_glossary_index_url(),
            base_url,
            item_delay: Duration::from_millis(delay_ms),
            requests: 0,
        })
    }

    /// Runs the crawl to completion
    ///
    /// An index page that cannot be fetched is fatal; everything after
    /// discovery is per-item and survives individual failures.
    pub async fn run(&mut self) -> Result<RunSummary> {
        tracing::info!("Starting glossary crawl");

        let urls = self.discover().await?;
        let mut summary = RunSummary {
            total: urls.len(),
            ..RunSummary::default()
        };

        if urls.is_empty() {
            tracing::info!("No glossary term URLs found");
            return Ok(summary);
        }

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("Processing URL {}/{}: {}", index + 1, urls.len(), url);

            let outcome = self.process_url(url).await;
            match &outcome {
                ItemOutcome::Saved => {}
                ItemOutcome::Skipped => {
                    tracing::info!("Glossary term {} skipped", url)
                }
                ItemOutcome::Failed(e) => tracing::warn!("Failed to process {}: {}", url, e),
            }
            summary.record(&outcome);

            // Politeness padding between items, independent of the limiter
            tokio::time::sleep(self.item_delay).await;
        }

        summary.requests = self.requests;
        tracing::info!(
            "Glossary crawl completed: {}/{} succeeded ({} saved, {} failed, {} requests)",
            summary.succeeded(),
            summary.total,
            summary.saved,
            summary.failed,
            summary.requests
        );
        tracing::info!(
            "Store now holds {} keywords and {} synonyms",
            self.store.count_keywords().unwrap_or_default(),
            self.store.count_synonyms().unwrap_or_default()
        );

        Ok(summary)
    }

    /// Fetches the glossary index and collects term URLs
    async fn discover(&mut self) -> Result<Vec<String>> {
        tracing::info!("Fetching glossary index from {}", self.index_url);
        self.requests += 1;

        let body = self.fetcher.fetch(&self.index_url).await.ok_or_else(|| {
            GleanError::Discovery {
                source_url: self.index_url.clone(),
                message: "failed to fetch glossary index".to_string(),
            }
        })?;

        let urls = glossary_links(&body, &self.base_url);
        tracing::info!("Found {} unique glossary term URLs", urls.len());
        Ok(urls)
    }

    /// Processes a single term URL; failures are captured, never propagated
    async fn process_url(&mut self, url: &str) -> ItemOutcome {
        let keyword = derive_keyword(url);
        if keyword.is_empty() {
            return ItemOutcome::Failed(ItemError::Extract(
                "could not derive keyword from URL".to_string(),
            ));
        }

        self.limiter.acquire().await;
        self.requests += 1;

        let Some(html) = self.fetcher.fetch(url).await else {
            return ItemOutcome::Failed(ItemError::Fetch(
                "failed to fetch page content".to_string(),
            ));
        };

        let doc = Html::parse_document(&html);
        let root = HtmlNode::document_root(&doc);

        let Some(definition) = extract_definition(&root) else {
            return ItemOutcome::Failed(ItemError::Extract(
                "no definition found on page".to_string(),
            ));
        };
        let synonyms = extract_synonyms(&root);

        let action = match self
            .store
            .upsert_keyword(&keyword, &definition, GLOSSARY_CATEGORY)
        {
            Ok(KeywordUpsert::Inserted) => "Saved",
            Ok(KeywordUpsert::Updated) => "Updated",
            Err(e) => return ItemOutcome::Failed(ItemError::Persist(e.to_string())),
        };

        // Synonym failures are per-synonym: a duplicate or bad row never
        // fails the keyword item
        let mut synonyms_saved = 0;
        for synonym in &synonyms {
            match self.store.insert_synonym(synonym, &keyword) {
                Ok(true) => synonyms_saved += 1,
                Ok(false) => {
                    tracing::debug!("Synonym \"{}\" for \"{}\" already recorded", synonym, keyword)
                }
                Err(e) => tracing::warn!(
                    "Error saving synonym \"{}\" for \"{}\": {}",
                    synonym,
                    keyword,
                    e
                ),
            }
        }

        tracing::info!(
            "{} definition for \"{}\" with {} synonyms",
            action,
            keyword,
            synonyms_saved
        );
        ItemOutcome::Saved
    }
}
