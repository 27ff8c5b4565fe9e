//! Retry Policy - Exponential Backoff on Rate Limits
//!
//! Wraps any async operation. When the operation fails with
//! `ChainError::RateLimited` the policy sleeps, doubles the delay and
//! tries again, up to `max_retries` attempts in total. Any other error
//! is returned immediately. Applied explicitly at every outbound call
//! site (contract calls, block fetches, price and explorer lookups).
//!
//! Cancellation is cooperative: dropping the returned future stops the
//! loop at its next await point (a request or a sleep).

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::error::ChainError;

/// Backoff parameters for rate-limited upstreams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up.
    pub max_retries: u32,
    /// Sleep before the second attempt; doubled after every retry.
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }

    /// Run `call` until it succeeds, fails hard, or the budget runs out.
    ///
    /// `operation` names the call in log lines and in
    /// `ChainError::RetryExhausted`.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, ChainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ChainError>>,
    {
        let mut delay = self.initial_delay;

        for attempt in 1..=self.max_retries {
            match call().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "Succeeded after rate limiting");
                    }
                    return Ok(value);
                }
                Err(e) if e.is_rate_limited() => {
                    if attempt == self.max_retries {
                        break;
                    }
                    warn!(
                        operation,
                        attempt,
                        delay_ms = millis(delay),
                        "429 encountered, backing off"
                    );
                    sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(operation, attempts = self.max_retries, "Retry budget exhausted");
        Err(ChainError::RetryExhausted {
            operation: operation.to_string(),
            attempts: self.max_retries,
        })
    }
}

/// Whole milliseconds for log fields, saturating at `u64::MAX`.
fn millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
