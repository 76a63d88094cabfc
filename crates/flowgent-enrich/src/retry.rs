//! Back-off retries for generative API calls.
//!
//! Only transient failures are retried; a bad answer from the model is final.

use std::future::Future;
use std::time::Duration;

use crate::error::EnrichmentError;

/// Upper bound on any single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Timeouts, connect failures, 429 and 5xx are transient. Everything else,
/// including 4xx, empty or unparseable answers and configuration errors, is
/// not.
pub(crate) fn is_retriable(err: &EnrichmentError) -> bool {
    match err {
        EnrichmentError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        EnrichmentError::RateLimited { .. } => true,
        EnrichmentError::UnexpectedStatus { status, .. } => *status >= 500,
        EnrichmentError::EmptyResponse
        | EnrichmentError::UnparseableScore(_)
        | EnrichmentError::MissingApiKey
        | EnrichmentError::InvalidBaseUrl { .. } => false,
    }
}

/// Sleep before retry number `retry` (1-based).
///
/// `base_ms * 2^(retry-1)` scaled by `jitter` (expected in `[0.75, 1.25)`).
/// A 429 that asks for a longer wait gets that wait instead. The result never
/// exceeds [`MAX_DELAY_MS`].
fn backoff_delay(retry: u32, base_ms: u64, jitter: f64, err: &EnrichmentError) -> Duration {
    let exponential = base_ms.saturating_mul(1u64 << retry.saturating_sub(1).min(10));
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (exponential as f64 * jitter) as u64;

    let server_requested = match err {
        EnrichmentError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1_000),
        _ => 0,
    };

    Duration::from_millis(jittered.max(server_requested).min(MAX_DELAY_MS))
}

/// Call `operation` until it succeeds, fails with a non-transient error, or
/// `max_retries` retries have been spent.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, EnrichmentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, EnrichmentError>>,
{
    let mut retries = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if retries >= max_retries || !is_retriable(&err) {
            return Err(err);
        }
        retries += 1;

        let jitter = 0.75 + rand::random::<f64>() * 0.5;
        let delay = backoff_delay(retries, backoff_base_ms, jitter, &err);
        tracing::warn!(
            retry = retries,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(MAX_DELAY_MS),
            error = %err,
            "enrich: generative API call failed, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}
