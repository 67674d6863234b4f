//! HTTP fetcher with URL allowlisting
//!
//! This module handles all HTTP requests for the crawlers:
//! - Building the HTTP client with a fixed desktop user agent
//! - Validating URLs before any network call (scheme and domain allowlist)
//! - Fetching page bodies, mapping every failure to a skip

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Desktop browser user agent sent with every request
///
/// Some documentation hosts throttle obvious bot agents; a browser string
/// keeps the anti-bot friction low for a read-only crawl.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Builds an HTTP client with proper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages from a single allowed domain
pub struct PageFetcher {
    client: Client,
    allowed_domain: String,
}

impl PageFetcher {
    /// Creates a fetcher restricted to the given domain fragment
    pub fn new(client: Client, allowed_domain: impl Into<String>) -> Self {
        Self {
            client,
            allowed_domain: allowed_domain.into(),
        }
    }

    /// Validates a raw URL against the fetch policy
    ///
    /// The scheme must be http or https and the host must contain the
    /// allowed domain fragment. No network traffic happens here.
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The parsed URL, safe to fetch
    /// * `Err(String)` - Human-readable rejection reason
    pub fn validate(&self, raw_url: &str) -> Result<Url, String> {
        let url = Url::parse(raw_url).map_err(|e| format!("unparseable URL: {}", e))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(format!("disallowed scheme '{}'", other)),
        }

        let host = url.host_str().ok_or_else(|| "missing host".to_string())?;
        if !host.contains(&self.allowed_domain) {
            return Err(format!(
                "host '{}' outside allowed domain '{}'",
                host, self.allowed_domain
            ));
        }

        Ok(url)
    }

    /// Fetches the body of a page
    ///
    /// Returns `None` on validation failure (logged, no network call), on
    /// network errors, and on non-2xx responses. Callers treat `None` as
    /// "skip this item", never as a fatal condition. There is no retry; a
    /// failed fetch is simply recorded against the current run.
    pub async fn fetch(&self, raw_url: &str) -> Option<String> {
        let url = match self.validate(raw_url) {
            Ok(url) => url,
            Err(reason) => {
                tracing::warn!("Rejected URL {}: {}", raw_url, reason);
                return None;
            }
        };

        tracing::debug!("Fetching {}", url);

        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("HTTP {} from {}", status, url);
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!("Failed to read body from {}: {}", url, e);
                None
            }
        }
    }
}
