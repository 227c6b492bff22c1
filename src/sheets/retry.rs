//! Exponential backoff for Google API calls.
//!
//! Only transient failures are retried (see [`SheetsError::is_transient`]):
//! rate limiting, server errors, timeouts and connection failures. Everything
//! else is returned on the first attempt. Writes that are not idempotent pass a
//! narrower predicate to [`Backoff::run_if`].
//!
//! # Backoff Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..=max_jitter)
//! ```

use super::SheetsError;
use rand::{Rng, rng};
use std::future::Future;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, warn};

/// Retry policy applied to each Sheets or Drive request.
#[derive(Debug, Clone)]
pub struct Backoff {
    /// Retries after the first attempt; `0` disables retrying.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
    max_jitter_ms: u64,
}

impl Backoff {
    /// `max_retries` attempts after the first, starting at one second.
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: StdDuration::from_secs(1),
            max_delay: StdDuration::from_secs(30),
            max_jitter_ms: 250,
        }
    }

    #[cfg(test)]
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: StdDuration::from_millis(1),
            max_delay: StdDuration::from_millis(1),
            max_jitter_ms: 0,
        }
    }

    /// Delay before retry number `attempt` (1-based), without jitter.
    fn delay_for(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(31) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, F, Fut>(&self, operation: &'static str, op: F) -> Result<T, SheetsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SheetsError>>,
    {
        self.run_if(operation, SheetsError::is_transient, op).await
    }

    /// Like [`Backoff::run`], retrying only errors for which `retryable` holds.
    pub async fn run_if<T, F, Fut>(
        &self,
        operation: &'static str,
        retryable: fn(&SheetsError) -> bool,
        mut op: F,
    ) -> Result<T, SheetsError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, SheetsError>>,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let e = match op().await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };
            attempt += 1;

            if !retryable(&e) {
                return Err(e);
            }
            if attempt > self.max_retries {
                error!(
                    operation,
                    attempt,
                    max = self.max_retries,
                    elapsed_ms_total = total_t0.elapsed().as_millis(),
                    error = %e,
                    "Google API call exhausted retries"
                );
                return Err(e);
            }

            let jitter_ms: u64 = rng().random_range(0..=self.max_jitter_ms);
            let delay = self.delay_for(attempt) + StdDuration::from_millis(jitter_ms);
            warn!(
                operation,
                attempt,
                max = self.max_retries,
                ?delay,
                error = %e,
                "Google API call failed; backing off"
            );
            sleep(delay).await;
        }
    }
}
