//! Request rate limiting
//!
//! A single global cursor per crawler instance enforces minimum spacing
//! between fetches. Processing is strictly sequential, so there is no queue
//! or fairness concern; acquiring is a pure wait and never errors.

use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Enforces a minimum interval between consecutive acquisitions
pub struct RateLimiter {
    min_interval: Duration,
    last_grant: Option<Instant>,
}

impl RateLimiter {
    /// Creates a rate limiter for the given fetch rate
    ///
    /// The minimum interval is `60_000 / requests_per_minute` milliseconds.
    /// Rates are validated positive at config load; a zero slipping through
    /// is clamped to one request per minute's worth of spacing.
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self {
            min_interval: Duration::from_millis(60_000 / u64::from(rpm)),
            last_grant: None,
        }
    }

    /// Waits until the minimum interval since the last grant has elapsed
    pub async fn acquire(&mut self) {
        if let Some(last) = self.last_grant {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?} before next request", wait);
                sleep(wait).await;
            }
        }
        self.last_grant = Some(Instant::now());
    }
}
