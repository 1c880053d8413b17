//! Exponential-backoff retry for transient source errors.
//!
//! Transient errors (rate limits, network failures) are retried after a
//! backoff delay; permanent errors (auth rejection, malformed payloads,
//! unexpected statuses) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use redintel_core::SourceError;

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a transient error the function sleeps `backoff_base_secs * 2^attempt`
/// seconds and tries again, up to `max_retries` additional attempts after the
/// first try. Permanent errors and exhausted retries return the last error.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                err
            }
        };

        // Cap the shift to prevent overflow on extreme configs.
        let delay_secs = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient source error — retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
