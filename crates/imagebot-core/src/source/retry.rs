//! Single-retry handling for upstream 429 responses.
//!
//! The first attempt and the retry run through the same closure, so the two
//! requests are built identically.

use crate::error::FetchError;
use std::future::Future;
use std::time::Duration;

/// Outcome of one HTTP attempt, before retry handling.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The attempt finished: success, a non-429 status, or a transport error
    Done(Result<T, FetchError>),
    /// Upstream answered 429; `retry_after` is the wait it asked for
    RateLimited { retry_after: Duration },
}

/// Parse a `Retry-After` header value as whole seconds.
///
/// Missing or non-integer values (including the HTTP-date form) fall back
/// to `default`.
pub fn parse_retry_after(value: Option<&str>, default: Duration) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Run `attempt`, and on a 429 sleep for the advertised delay and run it
/// exactly once more.
///
/// A retry that does not succeed yields [`FetchError::RateLimited`] carrying
/// the retry's status; a transport failure on the retry stays a
/// [`FetchError::NetworkFailure`].
pub async fn with_single_retry<T, F, Fut>(mut attempt: F) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt<T>>,
{
    let retry_after = match attempt().await {
        Attempt::Done(result) => return result,
        Attempt::RateLimited { retry_after } => retry_after,
    };

    tracing::warn!("Upstream rate limited, waiting {retry_after:?} before retry");
    tokio::time::sleep(retry_after).await;

    match attempt().await {
        Attempt::Done(Ok(value)) => {
            tracing::debug!("Retry after rate limit succeeded");
            Ok(value)
        }
        Attempt::Done(Err(FetchError::UpstreamError { status, body })) => {
            tracing::warn!("Retry after rate limit failed: HTTP {status}: {body}");
            Err(FetchError::RateLimited { status })
        }
        Attempt::Done(Err(e)) => Err(e),
        Attempt::RateLimited { .. } => {
            tracing::warn!("Still rate limited after retry, giving up");
            Err(FetchError::RateLimited { status: 429 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[test]
    fn test_parse_retry_after() {
        let default = Duration::from_secs(5);
        assert_eq!(parse_retry_after(Some("2"), default), Duration::from_secs(2));
        assert_eq!(parse_retry_after(Some(" 7 "), default), Duration::from_secs(7));
        assert_eq!(parse_retry_after(Some("0"), default), Duration::ZERO);
        assert_eq!(parse_retry_after(None, default), default);
        assert_eq!(parse_retry_after(Some("soon"), default), default);
        assert_eq!(parse_retry_after(Some("1.5"), default), default);
        assert_eq!(
            parse_retry_after(Some("Wed, 21 Oct 2015 07:28:00 GMT"), default),
            default
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result = with_single_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Attempt::Done(Ok(42)) }
        })
        .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_429_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = with_single_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Attempt::Done(Err(FetchError::UpstreamError {
                    status: 500,
                    body: "boom".to_string(),
                }))
            }
        })
        .await;
        assert_eq!(
            result,
            Err(FetchError::UpstreamError {
                status: 500,
                body: "boom".to_string()
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_429_then_success_waits_retry_after() {
        let calls = AtomicU32::new(0);
        let start = Instant::now();
        let result = with_single_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Attempt::RateLimited {
                        retry_after: Duration::from_secs(2),
                    }
                } else {
                    Attempt::Done(Ok("images"))
                }
            }
        })
        .await;
        assert_eq!(result, Ok("images"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(start.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_429_gives_up() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_single_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Attempt::RateLimited {
                    retry_after: Duration::from_secs(1),
                }
            }
        })
        .await;
        assert_eq!(result, Err(FetchError::RateLimited { status: 429 }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_failure_reports_retry_status() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_single_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Attempt::RateLimited {
                        retry_after: Duration::from_secs(1),
                    }
                } else {
                    Attempt::Done(Err(FetchError::UpstreamError {
                        status: 503,
                        body: String::new(),
                    }))
                }
            }
        })
        .await;
        assert_eq!(result, Err(FetchError::RateLimited { status: 503 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_on_retry_is_preserved() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_single_retry(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Attempt::RateLimited {
                        retry_after: Duration::ZERO,
                    }
                } else {
                    Attempt::Done(Err(FetchError::NetworkFailure {
                        message: "reset".to_string(),
                    }))
                }
            }
        })
        .await;
        assert!(matches!(result, Err(FetchError::NetworkFailure { .. })));
    }
}
