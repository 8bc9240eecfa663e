//! Retry with backoff for any async operation.
//!
//! The helpers here do not look at the error: every failure is retried until
//! the budget is spent. Only wrap idempotent calls (`GET` endpoints, or `POST`
//! endpoints the backend treats as pure queries such as `/station-info`).

use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Defines how long to wait between attempts, and how many retries to make.
///
/// # Examples
///
/// ```
/// use lineplanner_client::RetryStrategy;
/// use std::time::Duration;
///
/// // 100ms, 200ms, 400ms
/// let exponential = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(100),
///     max_delay: Duration::from_secs(30),
///     max_retries: 3,
///     jitter: false,
/// };
/// assert_eq!(exponential.delay_for_attempt(3), Some(Duration::from_millis(400)));
/// assert_eq!(exponential.delay_for_attempt(4), None);
///
/// // 1s, 1s
/// let linear = RetryStrategy::Linear {
///     delay: Duration::from_secs(1),
///     max_retries: 2,
/// };
/// assert_eq!(linear.max_retries(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryStrategy {
    /// A single attempt.
    #[default]
    None,

    /// Waits `initial_delay * 2^(attempt - 1)`, capped at `max_delay`.
    ExponentialBackoff {
        /// The delay before the first retry.
        initial_delay: Duration,
        /// The maximum delay between retries.
        max_delay: Duration,
        /// The maximum number of retries after the initial attempt.
        max_retries: usize,
        /// Scale each delay by a random factor in `[0.5, 1.0]`.
        jitter: bool,
    },

    /// Waits the same delay before every retry.
    Linear {
        /// The delay between attempts.
        delay: Duration,
        /// The maximum number of retries after the initial attempt.
        max_retries: usize,
    },
}

impl RetryStrategy {
    /// Uncapped exponential backoff without jitter.
    pub fn exponential(max_retries: usize, base_delay: Duration) -> Self {
        RetryStrategy::ExponentialBackoff {
            initial_delay: base_delay,
            max_delay: Duration::MAX,
            max_retries,
            jitter: false,
        }
    }

    /// Three retries starting at one second.
    pub fn default_backoff() -> Self {
        Self::exponential(3, Duration::from_millis(1000))
    }

    /// Returns the delay before the given retry, or `None` once retries are exhausted.
    ///
    /// `attempt` is 1-indexed: `1` is the first retry.
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
                jitter,
            } => {
                if attempt == 0 || attempt > *max_retries {
                    return None;
                }

                let exponent = u32::try_from(attempt - 1).unwrap_or(u32::MAX);
                let multiplier = 2u32.saturating_pow(exponent);
                let delay = initial_delay.saturating_mul(multiplier).min(*max_delay);

                if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    Some(delay.mul_f64(jitter_factor))
                } else {
                    Some(delay)
                }
            }
            RetryStrategy::Linear { delay, max_retries } => {
                if attempt == 0 || attempt > *max_retries {
                    None
                } else {
                    Some(*delay)
                }
            }
        }
    }

    /// The maximum number of retries after the initial attempt.
    pub fn max_retries(&self) -> usize {
        match self {
            RetryStrategy::None => 0,
            RetryStrategy::ExponentialBackoff { max_retries, .. } => *max_retries,
            RetryStrategy::Linear { max_retries, .. } => *max_retries,
        }
    }
}

/// Runs `operation` up to `max_retries + 1` times, waiting `base_delay * 2^k`
/// after the k-th failure (0-indexed).
///
/// Returns the first success. If every attempt fails, the error of the last
/// attempt is returned unchanged.
///
/// # Examples
///
/// ```no_run
/// use lineplanner_client::{retry::retry, Client};
/// use std::time::Duration;
///
/// # async fn example() -> lineplanner_client::Result<()> {
/// let client = Client::builder().build()?;
///
/// let layers = retry(|| client.layers(), 3, Duration::from_millis(500)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry<F, Fut, T, E>(
    operation: F,
    max_retries: usize,
    base_delay: Duration,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    retry_with(&RetryStrategy::exponential(max_retries, base_delay), operation).await
}

/// Runs `operation` until it succeeds or `strategy` runs out of retries.
pub async fn retry_with<F, Fut, T, E>(strategy: &RetryStrategy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let error = match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        match strategy.delay_for_attempt(attempt) {
            Some(delay) => {
                tracing::info!(
                    error = %error,
                    attempt = attempt,
                    delay_ms = delay.as_millis(),
                    "Operation failed, retrying after delay"
                );
                tokio::time::sleep(delay).await;
            }
            None => {
                tracing::warn!(
                    error = %error,
                    attempts = attempt,
                    "Operation failed, no retries left"
                );
                return Err(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_exponential_backoff_delays() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_retries: 5,
            jitter: false,
        };

        assert_eq!(
            strategy.delay_for_attempt(1),
            Some(Duration::from_millis(100))
        );
        assert_eq!(
            strategy.delay_for_attempt(2),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            strategy.delay_for_attempt(3),
            Some(Duration::from_millis(400))
        );
        assert_eq!(
            strategy.delay_for_attempt(5),
            Some(Duration::from_millis(1600))
        );
        assert_eq!(strategy.delay_for_attempt(6), None);
    }

    #[test]
    fn test_exponential_backoff_capped() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            max_retries: 10,
            jitter: false,
        };

        assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_secs(4)));
        assert_eq!(strategy.delay_for_attempt(4), Some(Duration::from_secs(5)));
        assert_eq!(strategy.delay_for_attempt(10), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            max_retries: 3,
            jitter: true,
        };

        for _ in 0..20 {
            let delay = strategy.delay_for_attempt(2).unwrap();
            assert!(delay >= Duration::from_millis(200));
            assert!(delay <= Duration::from_millis(400));
        }
    }

    #[test]
    fn test_linear_delays() {
        let strategy = RetryStrategy::Linear {
            delay: Duration::from_secs(1),
            max_retries: 2,
        };

        assert_eq!(strategy.delay_for_attempt(1), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(2), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(3), None);
    }

    #[test]
    fn test_no_retry() {
        let strategy = RetryStrategy::None;
        assert_eq!(strategy.delay_for_attempt(1), None);
        assert_eq!(strategy.max_retries(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_on_fourth_attempt() {
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        let result = retry(
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(ApiError::network(format!("attempt {} failed", attempt)))
                    } else {
                        Ok(attempt)
                    }
                }
            },
            3,
            Duration::from_millis(100),
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(start.elapsed() >= Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_surfaces_last_error() {
        let calls = AtomicUsize::new(0);

        let result: Result<(), ApiError> = retry(
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Err(ApiError::new(
                        format!("attempt {} failed", attempt),
                        503,
                        "SERVICE_UNAVAILABLE",
                    ))
                }
            },
            2,
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            result,
            Err(ApiError::new("attempt 2 failed", 503, "SERVICE_UNAVAILABLE"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_is_single_attempt() {
        let calls = AtomicUsize::new(0);
        let start = Instant::now();

        let result: Result<(), ApiError> = retry(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ApiError::network("connection refused")) }
            },
            0,
            Duration::from_secs(1),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_with_linear_strategy() {
        let calls = AtomicUsize::new(0);
        let start = Instant::now();
        let strategy = RetryStrategy::Linear {
            delay: Duration::from_millis(250),
            max_retries: 4,
        };

        let result = retry_with(&strategy, || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err("not yet")
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(start.elapsed() >= Duration::from_millis(500));
    }
}
