use btc_staking_store::StakeResult;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

/// Runs `operation` until it succeeds, fails with a non-retryable error or
/// runs out of attempts. The delay doubles after every failed attempt.
pub async fn with_backoff<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> StakeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StakeResult<T>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(error) if error.is_retryable() && attempt < policy.attempts => {
                let delay = policy.base_delay * 2u32.saturating_pow(attempt - 1);
                warn!(
                    "Store call failed (attempt {}/{}), retrying in {:?}: {}",
                    attempt, policy.attempts, delay, error
                );
                sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
