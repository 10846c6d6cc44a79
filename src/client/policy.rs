use crate::error::DomainError;
use crate::Result;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Decision for how to proceed after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decision {
    Retry { delay: Duration },
    Fail,
}

/// Bounded exponential backoff with jitter.
///
/// - `max_retries` is the number of retries after the first attempt; zero executes once.
/// - The delay before retry `n` (0-based) is `min(max_delay, base_delay * 2^n * U[1, 2))`.
/// - Errors that are not recoverable, or carry a 4xx status other than 429, abort at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Policy that executes exactly once.
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn with_backoff(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay.max(base_delay);
        self
    }

    /// Delay before retry `retry` (0-based), jittered.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = rand::thread_rng().gen_range(1.0..2.0);
        self.backoff_delay_with(retry, factor)
    }

    /// Delay before retry `retry` with an explicit jitter `factor` in `[1, 2)`.
    pub(crate) fn backoff_delay_with(&self, retry: u32, factor: f64) -> Duration {
        let exp = 2f64.powi(retry.min(30) as i32);
        let millis = self.base_delay.as_millis() as f64 * exp * factor;
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    pub fn should_retry(err: &DomainError) -> bool {
        err.recoverable && !err.is_client_status()
    }

    /// Decide what to do after retry-able attempt `retries_done` (0-based) failed.
    pub(crate) fn decide(&self, err: &DomainError, retries_done: u32) -> Decision {
        if Self::should_retry(err) && retries_done < self.max_retries {
            Decision::Retry {
                delay: self.backoff_delay(retries_done),
            }
        } else {
            Decision::Fail
        }
    }

    /// Run `op` until it succeeds, a failure aborts, or retries are exhausted.
    ///
    /// `op` receives the 0-based attempt number. The last failure is returned unchanged.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;
        loop {
            let err = match op(attempt).await {
                Ok(v) => return Ok(v),
                Err(e) => e,
            };
            match self.decide(&err, attempt) {
                Decision::Retry { delay } => {
                    warn!(
                        error_code = err.code(),
                        http_status = ?err.status,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after recoverable failure"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Decision::Fail => return Err(err),
            }
        }
    }
}
