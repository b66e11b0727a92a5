//! Bounded retry with exponential backoff
//!
//! Both fragile spots of the run (the per-account traversal and the
//! save-and-verify gate) retry under an explicit budget and surface a typed
//! error when it is exhausted; nothing in this tool retries unboundedly.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;

/// Retry budget: attempt count plus backoff shape
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Always at least 1.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles per attempt after that.
    pub initial_delay: Duration,
    /// Ceiling for the backoff delay.
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            max_delay,
        }
    }

    /// Policy with no backoff delay, used in tests.
    #[cfg(test)]
    pub(crate) fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    /// Run `operation` until it succeeds or the attempt budget is spent.
    ///
    /// Every failed attempt short of the last is logged at WARN and
    /// followed by the backoff delay; the final failure is returned to the
    /// caller unchanged.
    pub async fn run<F, Fut, T>(&self, operation: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut delay = self.initial_delay;
        let mut attempt = 1u32;

        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) if attempt < self.max_attempts => {
                    warn!(operation, attempt, error = %err, "attempt failed, retrying");
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    delay = (delay * 2).min(self.max_delay);
                    attempt += 1;
                }
                Err(err) => {
                    warn!(operation, attempts = attempt, error = %err, "giving up");
                    return Err(err);
                }
            }
        }
    }
}
