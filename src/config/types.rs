use serde::Deserialize;

/// Main configuration structure for Docglean
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    pub store: StoreConfig,
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the target site (e.g., "https://metabase.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Domain fragment a URL's host must contain to be fetched
    #[serde(rename = "allowed-domain")]
    pub allowed_domain: String,

    /// Sitemap URL for docs discovery; defaults to `<base-url>/sitemap.xml`
    #[serde(rename = "sitemap-url", default)]
    pub sitemap_url: Option<String>,

    /// Glossary index URL; defaults to `<base-url>/glossary`
    #[serde(rename = "glossary-index-url", default)]
    pub glossary_index_url: Option<String>,
}

impl SiteConfig {
    /// Resolves the sitemap URL, falling back to the conventional location
    pub fn resolved_sitemap_url(&self) -> String {
        self.sitemap_url
            .clone()
            .unwrap_or_else(|| format!("{}/sitemap.xml", self.base_url.trim_end_matches('/')))
    }

    /// Resolves the glossary index URL, falling back to the conventional location
    pub fn resolved_glossary_index_url(&self) -> String {
        self.glossary_index_url
            .clone()
            .unwrap_or_else(|| format!("{}/glossary", self.base_url.trim_end_matches('/')))
    }
}

/// Crawl behavior configuration
///
/// All fields are optional; unset fields fall back to per-mode defaults
/// (docs: 50 requests/minute, 1000ms between items; glossary: 30
/// requests/minute, 2000ms between items).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlConfig {
    /// Maximum fetch rate, in requests per minute
    #[serde(rename = "requests-per-minute", default)]
    pub requests_per_minute: Option<u32>,

    /// Fixed pause after each processed item, in milliseconds
    #[serde(rename = "delay-between-items", default)]
    pub delay_between_items: Option<u64>,

    /// Minimum readable character count for article extraction
    #[serde(rename = "char-threshold", default)]
    pub char_threshold: Option<usize>,
}

/// Store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Connection string for the database: `sqlite:path`, `sqlite://path`,
    /// or a bare file path. The `DATABASE_URL` environment variable takes
    /// precedence when set.
    #[serde(rename = "database-url")]
    pub database_url: String,
}
