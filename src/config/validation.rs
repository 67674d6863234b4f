use crate::config::types::{Config, CrawlConfig, SiteConfig, StoreConfig};
use crate::storage::resolve_database_path;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// Validation failures are fatal: a run never starts with a bad URL, a
/// non-positive rate, or a malformed connection string.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    validate_store_config(&config.store)?;
    Ok(())
}

/// Validates target site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if config.allowed_domain.trim().is_empty() {
        return Err(ConfigError::Validation(
            "allowed-domain cannot be empty".to_string(),
        ));
    }

    if let Some(sitemap_url) = &config.sitemap_url {
        Url::parse(sitemap_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid sitemap-url: {}", e)))?;
    }

    if let Some(glossary_index_url) = &config.glossary_index_url {
        Url::parse(glossary_index_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid glossary-index-url: {}", e)))?;
    }

    Ok(())
}

/// Validates crawl behavior configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if let Some(rpm) = config.requests_per_minute {
        if rpm == 0 {
            return Err(ConfigError::Validation(
                "requests-per-minute must be positive".to_string(),
            ));
        }
    }

    if let Some(threshold) = config.char_threshold {
        if threshold == 0 {
            return Err(ConfigError::Validation(
                "char-threshold must be positive".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates the store connection string for well-formedness
///
/// The actual open happens later at run start; this only rejects strings the
/// store layer would refuse to interpret at all.
fn validate_store_config(config: &StoreConfig) -> Result<(), ConfigError> {
    resolve_database_path(&config.database_url)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidConnectionString(e.to_string()))
}
