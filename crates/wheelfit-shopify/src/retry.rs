//! Retry with exponential back-off for transient Admin API failures.
//!
//! [`retry_with_backoff`] wraps a fallible async operation and retries on
//! transient conditions only: 429 rate limits, network-level failures, and
//! 5xx responses. Client errors, parse failures, and pagination guards are
//! returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ShopifyError;

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// Retriable: [`ShopifyError::RateLimited`], [`ShopifyError::Http`], and
/// [`ShopifyError::UnexpectedStatus`] with a 5xx status.
///
/// Everything else is a hard stop: a 404 or 4xx will not change on retry, a
/// deserialize failure means the response shape is wrong, and the pagination
/// limit exists to break cursor cycles.
fn is_retriable(err: &ShopifyError) -> bool {
    match err {
        ShopifyError::RateLimited { .. } | ShopifyError::Http(_) => true,
        ShopifyError::UnexpectedStatus { status, .. } => *status >= 500,
        ShopifyError::Deserialize { .. }
        | ShopifyError::NotFound { .. }
        | ShopifyError::PaginationLimit { .. }
        | ShopifyError::InvalidShopDomain { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors, sleeping `backoff_base_secs * 2^attempt` seconds (±25% jitter,
/// capped at 60s) between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ShopifyError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShopifyError>>,
{
    const MAX_DELAY_SECS: u64 = 60;
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                let computed = backoff_base_secs.saturating_mul(1u64 << attempt.min(10));
                let capped = computed.min(MAX_DELAY_SECS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms =
                    ((capped * 1000) as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient Shopify error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> ShopifyError {
        ShopifyError::RateLimited {
            retry_after_secs: 0,
        }
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&ShopifyError::UnexpectedStatus {
            status: 503,
            url: "https://x.example/products.json".to_owned(),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&ShopifyError::UnexpectedStatus {
            status: 403,
            url: "https://x.example/products.json".to_owned(),
        }));
        assert!(!is_retriable(&ShopifyError::NotFound {
            url: "https://x.example/products.json".to_owned(),
        }));
    }

    #[test]
    fn deserialize_errors_are_not_retriable() {
        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(!is_retriable(&ShopifyError::Deserialize {
            context: "test".to_owned(),
            source,
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ShopifyError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_rate_limited_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, ShopifyError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ShopifyError>(rate_limited())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(ShopifyError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ShopifyError>(ShopifyError::NotFound {
                    url: "https://x.example/products.json".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ShopifyError::NotFound { .. })));
    }
}
