//! One retry policy shared by every endpoint call.
//!
//! Rate limits (429) and transient failures are budgeted separately: a 429 is
//! the server asking us to slow down, so waiting it out re-sends the same
//! request without consuming one of the transient attempts.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::pacer::Pacer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts for transient failures, first try included.
    pub max_attempts: u32,
    /// Fixed wait between transient attempts.
    pub backoff: Duration,
    /// Wait applied to a 429 without a usable `Retry-After` header.
    pub default_rate_limit_wait: Duration,
    /// Rate-limit waits allowed for a single request before giving up.
    pub max_rate_limit_waits: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_secs(30),
            default_rate_limit_wait: Duration::from_secs(30),
            max_rate_limit_waits: 10,
        }
    }
}

/// Returns `true` for errors worth another attempt after the fixed back-off.
///
/// **Retriable:** timeouts, connection failures, other transport errors, and
/// HTTP 5xx.
///
/// **Not retriable:** [`ApiError::Permanent`] (4xx other than 429),
/// malformed bodies, and cancellation. [`ApiError::RateLimited`] is handled
/// by its own budget in [`RetryPolicy::run`].
pub(crate) fn is_retriable(err: &ApiError) -> bool {
    match err {
        ApiError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.is_request()
                || e.is_body()
                || e.status().is_some_and(|s| s.is_server_error())
        }
        ApiError::ServerError { .. } => true,
        ApiError::RateLimited { .. }
        | ApiError::Permanent { .. }
        | ApiError::Deserialize { .. }
        | ApiError::Malformed { .. }
        | ApiError::Cancelled => false,
    }
}

impl RetryPolicy {
    /// Runs `operation` until it succeeds, fails permanently, or a budget is spent.
    ///
    /// `cancel` is checked before every attempt and interrupts any wait. A
    /// request already in flight is never aborted.
    ///
    /// # Errors
    ///
    /// Returns the last error once the relevant budget is exhausted, any
    /// non-retriable error immediately, or [`ApiError::Cancelled`].
    pub(crate) async fn run<T, F, Fut>(
        &self,
        pacer: &Pacer,
        cancel: &CancellationToken,
        label: &str,
        mut operation: F,
    ) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempt = 1u32;
        let mut rate_limit_waits = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled);
            }

            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if let ApiError::RateLimited {
                retry_after_secs, ..
            } = &err
            {
                let delay = Duration::from_secs(*retry_after_secs);
                if rate_limit_waits >= self.max_rate_limit_waits {
                    return Err(err);
                }
                rate_limit_waits += 1;
                tracing::warn!(
                    endpoint = label,
                    rate_limit_waits,
                    delay_secs = delay.as_secs(),
                    "rate limited, waiting before resending"
                );
                pacer.pause(delay, cancel).await?;
                continue;
            }

            if !is_retriable(&err) || attempt >= self.max_attempts {
                return Err(err);
            }

            tracing::warn!(
                endpoint = label,
                attempt,
                max_attempts = self.max_attempts,
                delay_secs = self.backoff.as_secs(),
                error = %err,
                "transient upstream error, retrying after back-off"
            );
            attempt += 1;
            pacer.pause(self.backoff, cancel).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn server_error() -> ApiError {
        ApiError::ServerError {
            status: 502,
            endpoint: "test".to_owned(),
        }
    }

    fn rate_limited(secs: u64) -> ApiError {
        ApiError::RateLimited {
            endpoint: "test".to_owned(),
            retry_after_secs: secs,
        }
    }

    #[test]
    fn permanent_error_is_not_retriable() {
        assert!(!is_retriable(&ApiError::Permanent {
            status: 400,
            endpoint: "test".to_owned(),
            body: "bad request".to_owned(),
        }));
    }

    #[test]
    fn malformed_error_is_not_retriable() {
        assert!(!is_retriable(&ApiError::Malformed {
            context: "test".to_owned(),
            reason: "missing data".to_owned(),
        }));
    }

    #[test]
    fn server_error_is_retriable() {
        assert!(is_retriable(&server_error()));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let pacer = Pacer::recording();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::default()
            .run(&pacer, &CancellationToken::new(), "test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, ApiError>(42)
                }
            })
            .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(pacer.recorded().is_empty());
    }

    #[tokio::test]
    async fn transient_failures_use_fixed_backoff_and_give_up_after_max_attempts() {
        let pacer = Pacer::recording();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::default()
            .run(&pacer, &CancellationToken::new(), "test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(server_error())
                }
            })
            .await;
        assert!(matches!(result, Err(ApiError::ServerError { status: 502, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "3 attempts in total");
        assert_eq!(
            pacer.recorded(),
            [Duration::from_secs(30), Duration::from_secs(30)]
        );
    }

    #[tokio::test]
    async fn rate_limit_waits_do_not_consume_attempts() {
        let pacer = Pacer::recording();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::default()
            .run(&pacer, &CancellationToken::new(), "test", || {
                let c = Arc::clone(&c);
                async move {
                    let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                    match n {
                        1..=4 => Err(rate_limited(12)),
                        5 | 6 => Err(server_error()),
                        _ => Ok(7u32),
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 7);
        let recorded = pacer.recorded();
        assert_eq!(recorded.len(), 6);
        assert!(recorded[..4].iter().all(|d| *d == Duration::from_secs(12)));
        assert!(recorded[4..].iter().all(|d| *d == Duration::from_secs(30)));
    }

    #[tokio::test]
    async fn rate_limit_budget_is_bounded() {
        let pacer = Pacer::recording();
        let policy = RetryPolicy {
            max_rate_limit_waits: 2,
            ..RetryPolicy::default()
        };
        let result = policy
            .run(&pacer, &CancellationToken::new(), "test", || async {
                Err::<u32, _>(rate_limited(5))
            })
            .await;
        assert!(matches!(result, Err(ApiError::RateLimited { .. })));
        assert_eq!(pacer.recorded().len(), 2);
    }

    #[tokio::test]
    async fn permanent_error_returns_without_waiting() {
        let pacer = Pacer::recording();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::default()
            .run(&pacer, &CancellationToken::new(), "test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Err::<u32, _>(ApiError::Permanent {
                        status: 401,
                        endpoint: "test".to_owned(),
                        body: "unauthorized".to_owned(),
                    })
                }
            })
            .await;
        assert!(matches!(result, Err(ApiError::Permanent { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(pacer.recorded().is_empty());
    }

    #[tokio::test]
    async fn cancelled_before_first_attempt_sends_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = RetryPolicy::default()
            .run(&Pacer::recording(), &cancel, "test", || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, ApiError>(1)
                }
            })
            .await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
