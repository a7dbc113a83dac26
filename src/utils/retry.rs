use std::future::Future;
use tracing::warn;
use crate::error::{Error, Result};
use crate::utils::time::sleep_with_jitter;

/// Rate limiting, 403s and transport failures are worth another attempt;
/// status and parse errors are not.
fn is_retriable(err: &Error) -> bool {
    matches!(err, Error::RateLimit | Error::Forbidden | Error::Http(_))
}

/// Runs `operation` up to `retries + 1` times, doubling the delay after each
/// retriable failure.
pub async fn retry_with_backoff<T, F, Fut>(
    mut retries: u32,
    base_delay_ms: u64,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delay = base_delay_ms;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if retries == 0 || !is_retriable(&e) {
                    return Err(e);
                }

                warn!(
                    error = %e,
                    delay_ms = delay,
                    retries_left = retries,
                    "Request failed, retrying"
                );

                retries -= 1;
                sleep_with_jitter(delay, delay / 2).await;
                delay = delay.saturating_mul(2);
            }
        }
    }
}
