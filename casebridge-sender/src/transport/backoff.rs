//! Truncated binary exponential backoff
//!
//! After the k-th failed attempt the caller sleeps a whole number of time
//! units drawn uniformly from `[0, 2^k - 1)`. `k` starts at 1 and stops
//! growing at the truncation ceiling. Only retryable transport failures are
//! retried; everything else is returned on the first occurrence.

use super::TransportError;
use casebridge_common::config::TransportConfig;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Retries after the first attempt, `None` for no bound
    pub max_retries: Option<u32>,
    /// Ceiling for the backoff exponent
    pub truncation: u32,
    /// Length of one backoff slot
    pub unit: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Some(5), 8)
    }
}

impl BackoffPolicy {
    pub fn new(max_retries: Option<u32>, truncation: u32) -> Self {
        Self {
            max_retries,
            truncation: truncation.max(1),
            unit: Duration::from_secs(1),
        }
    }

    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.retry_limit(), config.backoff_truncation)
    }

    /// Same retry bound, no sleeping between attempts
    pub fn without_delay(mut self) -> Self {
        self.unit = Duration::ZERO;
        self
    }

    /// Exclusive upper bound, in slots, of the delay after attempt `iteration`
    pub fn slot_bound(iteration: u32) -> u64 {
        (1u64 << iteration.min(63)) - 1
    }

    pub fn delay<R: Rng>(&self, iteration: u32, rng: &mut R) -> Duration {
        let bound = Self::slot_bound(iteration);
        let slots = if bound == 0 { 0 } else { rng.gen_range(0..bound) };
        self.unit.saturating_mul(u32::try_from(slots).unwrap_or(u32::MAX))
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out
pub async fn with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    mut operation: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut retries = 0u32;
    let mut iteration = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                error!(error = %e, attempt = retries + 1, "Transport failure");

                if policy.max_retries.is_some_and(|max| retries >= max) {
                    return Err(e);
                }
                retries += 1;

                let delay = policy.delay(iteration, &mut rand::thread_rng());
                debug!(delay_ms = delay.as_millis() as u64, iteration, "Backing off before retry");
                tokio::time::sleep(delay).await;

                if iteration < policy.truncation {
                    iteration += 1;
                }
            }
            Err(e) => return Err(e),
        }
    }
}
