//! Retry policy for storefront page fetches.
//!
//! 429s and dropped connections are retried with exponential backoff, stretched
//! to the site's `Retry-After` when it asks for longer. 404s, other non-2xx
//! statuses and malformed URLs fail on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Longest `Retry-After` a storefront can impose on a single wait.
const MAX_RETRY_AFTER_SECS: u64 = 10;

/// 429s and transport failures are worth another try; everything else repeats.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Wait before retry number `attempt + 1`.
///
/// Exponential `backoff_base_secs * 2^attempt`, raised to the site's
/// `Retry-After` (capped at [`MAX_RETRY_AFTER_SECS`]) when it asked for longer.
fn retry_delay(err: &ScraperError, backoff_base_secs: u64, attempt: u32) -> Duration {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    let requested = match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => (*retry_after_secs).min(MAX_RETRY_AFTER_SECS),
        _ => 0,
    };
    Duration::from_secs(backoff.max(requested))
}

/// Runs `operation`, retrying transient failures up to `max_retries` more times.
///
/// The last error is returned once retries run out; non-transient errors are
/// returned straight away.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    for attempt in 0..max_retries {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if is_retriable(&err) => {
                let delay = retry_delay(&err, backoff_base_secs, attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "storefront fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
    operation().await
}
