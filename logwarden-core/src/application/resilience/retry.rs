use super::classifier::{ErrorKind, classify};
use super::policy::RetryPolicy;
use crate::transport::TransportError;
use std::future::Future;
use tokio::time::sleep;
use tracing::{debug, error, warn};

/// Run `operation`, retrying only rate-limited failures.
///
/// Meant for the data-fetching collaborators around the agent, where a
/// desync cannot happen and every non-throttling error should surface as is.
pub async fn retry_rate_limited<F, Fut, T>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(err) => {
                let kind = classify(err.message());
                if kind != ErrorKind::RateLimited || attempt + 1 >= policy.max_attempts() {
                    error!(
                        attempt = attempt + 1,
                        max_attempts = policy.max_attempts(),
                        kind = %kind,
                        error = %err,
                        "Error not retriable or max attempts reached"
                    );
                    return Err(err);
                }
                let delay = policy.compute_delay(attempt);
                warn!(
                    attempt = attempt + 1,
                    max_attempts = policy.max_attempts(),
                    delay_secs = delay.as_secs_f64(),
                    "Rate limit exceeded, backing off"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
