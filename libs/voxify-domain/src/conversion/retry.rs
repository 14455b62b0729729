//! Bounded retry for transient upstream failures
//!
//! Wraps a single repeatable operation with retry-on-transient semantics:
//! rate limits and server errors are retried up to a fixed attempt budget
//! with capped exponential backoff; any other failure stops at the first
//! attempt. Either way, exhaustion surfaces as `RetriesExhausted` carrying
//! the number of attempts actually made.

use std::future::Future;
use std::time::Duration;

use crate::conversion::error::ConversionError;

/// Maximum total attempts for a transient failure
pub const MAX_GENERATION_ATTEMPTS: u32 = 3;

const BACKOFF_BASE: Duration = Duration::from_millis(200);
const BACKOFF_CAP: Duration = Duration::from_secs(2);

/// Run `op`, retrying on transient failures up to `max_attempts` total
/// attempts.
///
/// # Errors
///
/// Returns `ConversionError::RetriesExhausted` once the budget is spent.
/// Non-retryable failures exhaust immediately (attempt count 1).
pub async fn retry_transient<T, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, ConversionError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConversionError>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < max_attempts => {
                tokio::time::sleep(backoff_delay(attempt)).await;
            }
            Err(err) => return Err(ConversionError::retries_exhausted(attempt, err)),
        }
    }
}

/// Delay before the attempt following `attempt` (1-based), doubling from
/// [`BACKOFF_BASE`] and capped at [`BACKOFF_CAP`].
fn backoff_delay(attempt: u32) -> Duration {
    let doublings = (attempt - 1).min(16);
    BACKOFF_BASE.saturating_mul(1u32 << doublings).min(BACKOFF_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(MAX_GENERATION_ATTEMPTS, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ConversionError>("url") }
        })
        .await;

        assert_eq!(result.unwrap(), "url");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let calls = AtomicU32::new(0);
        let result = retry_transient(MAX_GENERATION_ATTEMPTS, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(ConversionError::upstream(429, "Rate limit exceeded"))
                } else {
                    Ok("url")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "url");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhausts_budget_on_persistent_transient_failure() {
        let calls = AtomicU32::new(0);
        let err = retry_transient(MAX_GENERATION_ATTEMPTS, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<&str, _>(ConversionError::upstream(429, "Rate limit exceeded")) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(err.to_string(), "Failed to convert image after 3 attempts");
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let calls = AtomicU32::new(0);
        let err = retry_transient(MAX_GENERATION_ATTEMPTS, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<&str, _>(ConversionError::upstream(400, "Invalid input")) }
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(err.to_string(), "Failed to convert image after 1 attempts");
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(2), Duration::from_millis(400));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
        assert_eq!(backoff_delay(10), BACKOFF_CAP);
    }
}
