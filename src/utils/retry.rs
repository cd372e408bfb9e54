//! Retry with exponential backoff for source fetches

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::errors::{SourceError, SourceResult};
use crate::utils::jitter::generate_jitter_percent;

/// Upper bound on a single backoff delay
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Share of the delay added as random jitter
const JITTER_PERCENT: u8 = 25;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: MAX_RETRY_DELAY,
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            ..Self::default()
        }
    }

    /// No delay between attempts
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            jitter: false,
            ..Self::default()
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31) as i32;
        let exponential_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let delay_ms = exponential_ms.min(self.max_delay.as_millis() as f64) as u64;

        if self.jitter {
            Duration::from_millis(delay_ms + generate_jitter_percent(delay_ms, JITTER_PERCENT))
        } else {
            Duration::from_millis(delay_ms)
        }
    }
}

/// Run `operation` until it succeeds, fails with a non-retryable error, or
/// the retry budget is spent
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
    operation_name: &str,
) -> SourceResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SourceResult<T>>,
{
    let total_attempts = policy.max_retries + 1;
    let mut attempt = 1;

    loop {
        let err: SourceError = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(
                        "'{}' succeeded on attempt {}/{}",
                        operation_name, attempt, total_attempts
                    );
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        if !err.is_retryable() {
            debug!("'{}' failed with non-retryable error: {}", operation_name, err);
            return Err(err);
        }

        if attempt >= total_attempts {
            warn!(
                "'{}' failed after {} attempts: {}",
                operation_name, total_attempts, err
            );
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        warn!(
            "'{}' failed on attempt {}/{}, retrying in {:?}: {}",
            operation_name, attempt, total_attempts, delay, err
        );
        sleep(delay).await;
        attempt += 1;
    }
}
