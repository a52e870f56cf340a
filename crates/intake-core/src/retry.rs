//! Bounded retry with per-attempt timeout and exponential backoff.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::ServiceError;

/// How a call is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts (at least one is always made).
    pub max_attempts: u32,
    /// Time budget for each individual attempt.
    pub per_attempt_timeout: Duration,
    /// Delay before the second attempt.
    pub initial_backoff: Duration,
    /// Factor applied to the delay after every failed attempt.
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            per_attempt_timeout: Duration::from_secs(20),
            initial_backoff: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, per_attempt_timeout: Duration, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            per_attempt_timeout,
            initial_backoff,
            ..Self::default()
        }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry(per_attempt_timeout: Duration) -> Self {
        Self::new(1, per_attempt_timeout, Duration::ZERO)
    }

    /// Delay to wait after the given (1-based) failed attempt.
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay_ms =
            self.initial_backoff.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        Duration::from_millis(delay_ms as u64)
    }
}

/// Run `call` until it succeeds or the policy's attempts are exhausted.
///
/// Each attempt is bounded by `per_attempt_timeout`; a timed-out attempt
/// counts as a failure with [`ServiceError::Timeout`]. Errors that are not
/// [`ServiceError::is_transient`] are returned immediately. When every
/// attempt fails, the last error is returned.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut call: F,
) -> Result<T, ServiceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ServiceError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        info!(call = label, attempt, max_attempts, "Attempting call");

        let outcome = match tokio::time::timeout(policy.per_attempt_timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout),
        };

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) if !err.is_transient() => {
                warn!(call = label, attempt, error = %err, "Call failed permanently");
                return Err(err);
            }
            Err(err) => {
                warn!(call = label, attempt, error = %err, "Call failed");
                last_error = Some(err);
            }
        }

        if attempt < max_attempts {
            let delay = policy.delay_after_attempt(attempt);
            info!(call = label, ?delay, next_attempt = attempt + 1, "Retrying after backoff");
            tokio::time::sleep(delay).await;
        }
    }

    let err = last_error
        .unwrap_or_else(|| ServiceError::ProcessingFailed(format!("{} made no attempts", label)));
    warn!(call = label, attempts = max_attempts, error = %err, "All attempts failed");
    Err(err)
}
