//! Retry with exponential backoff
//!
//! A unit's extraction is attempted up to `max_attempts` times. Between
//! attempts the delay doubles from `base_delay`; there is no delay after the
//! final attempt. The operation owns its state (a page session) for the
//! duration of an attempt and hands it back with the result, so the same
//! session is reused across attempts.

use crate::config::CrawlerConfig;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Largest exponent applied to the base delay
const MAX_BACKOFF_EXPONENT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_base_delay),
        )
    }

    /// Delay after the failed `attempt` (1-based): `base * 2^(attempt - 1)`
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Result of a retried operation
#[derive(Debug)]
pub struct RetryOutcome<S, T, E> {
    /// The state handed back by the last attempt
    pub state: S,
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Runs `operation` until it succeeds or the attempt budget is spent
///
/// # Arguments
///
/// * `policy` - Attempt budget and base delay
/// * `url` - The unit being retried, for logging
/// * `state` - State threaded through each attempt
/// * `operation` - Called with the attempt number and the state
pub async fn retry_with_backoff<S, T, E, F, Fut>(
    policy: &RetryPolicy,
    url: &str,
    mut state: S,
    mut operation: F,
) -> RetryOutcome<S, T, E>
where
    E: Display,
    F: FnMut(u32, S) -> Fut,
    Fut: Future<Output = (S, Result<T, E>)>,
{
    let mut attempt = 1;

    loop {
        let (returned, result) = operation(attempt, state).await;
        state = returned;

        match result {
            Ok(value) => {
                return RetryOutcome {
                    state,
                    result: Ok(value),
                    attempts: attempt,
                }
            }
            Err(e) if attempt >= policy.max_attempts => {
                tracing::error!(url = %url, attempt, "Giving up after {} attempts: {}", attempt, e);
                return RetryOutcome {
                    state,
                    result: Err(e),
                    attempts: attempt,
                };
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    url = %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Attempt failed, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
