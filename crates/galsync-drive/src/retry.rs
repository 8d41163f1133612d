//! Bounded retry for Drive API calls
//!
//! Every remote call goes through [`with_retry`]:
//! - HTTP 429 waits for the server's `Retry-After` hint when present
//! - 5xx and connection errors back off `base_delay * 2^attempt`
//! - any other failure is returned immediately
//!
//! ```rust,no_run
//! use galsync_drive::retry::{with_retry, RetryPolicy};
//! use galsync_drive::DriveError;
//!
//! # async fn example() -> Result<(), DriveError> {
//! let policy = RetryPolicy::default();
//! let value = with_retry(&policy, "probe", || async { Ok::<_, DriveError>(42) }).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::time::Duration;

use galsync_core::config::RetryConfig;
use tracing::{info, warn};

use crate::DriveError;

/// Longest `Retry-After` hint honoured from an HTTP-date
const MAX_RETRY_AFTER_SECS: u64 = 3600;

/// Retry budget and backoff base for remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff base; attempt `n` waits `base_delay * 2^n`
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay before retry number `attempt + 1`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

/// Parses a `Retry-After` header value.
///
/// Accepts integer seconds, clamped to one hour, or an HTTP-date. Dates
/// more than an hour away, dates in the past, and unparseable values yield
/// `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        if seconds > MAX_RETRY_AFTER_SECS {
            warn!(seconds, "Retry-After exceeds one hour, clamping");
        }
        return Some(Duration::from_secs(seconds.min(MAX_RETRY_AFTER_SECS)));
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value) {
        let diff = date.with_timezone(&chrono::Utc) - chrono::Utc::now();
        if let Some(secs) = u64::try_from(diff.num_seconds())
            .ok()
            .filter(|&s| s > 0 && s <= MAX_RETRY_AFTER_SECS)
        {
            return Some(Duration::from_secs(secs));
        }
    }

    warn!(value, "Could not parse Retry-After header, using backoff");
    None
}

/// Executes an async operation with bounded retry.
///
/// Only [transient](DriveError::is_transient) errors are retried. After
/// `policy.max_retries` retries the last error is returned.
pub async fn with_retry<F, Fut, T>(
    policy: &RetryPolicy,
    operation_name: &str,
    f: F,
) -> Result<T, DriveError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, DriveError>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => {
                if attempt > 0 {
                    info!(
                        operation = operation_name,
                        attempt, "Operation succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(err) if attempt < policy.max_retries && err.is_transient() => {
                let delay = match err {
                    DriveError::TooManyRequests {
                        retry_after: Some(hint),
                    } => hint,
                    _ => policy.delay_for(attempt),
                };
                warn!(
                    operation = operation_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
