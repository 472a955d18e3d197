use crate::client::{ObservedStake, StakeObserver};
use crate::retry::{with_backoff, RetryPolicy};
use btc_staking_store::{NewStake, StakeError, StakeStore};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    pub created: usize,
    pub already_registered: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Registers every observed stake. Re-observed transactions are expected and
/// counted as already registered.
pub async fn register_observed(
    store: &StakeStore,
    stakes: Vec<ObservedStake>,
    retry: &RetryPolicy,
) -> RegisterSummary {
    let mut summary = RegisterSummary::default();
    for stake in stakes {
        let stake = NewStake::from(stake);
        match with_backoff(retry, || store.create(stake.clone())).await {
            Ok(_) => summary.created += 1,
            Err(StakeError::DuplicateTransaction(_)) => summary.already_registered += 1,
            Err(StakeError::Validation(reason)) => {
                warn!("Rejected observed stake {}: {}", stake.tx, reason);
                summary.rejected += 1;
            }
            Err(err) => {
                error!("Could not register stake {}: {:?}", stake.tx, err);
                summary.failed += 1;
            }
        }
    }
    summary
}

pub async fn run<O: StakeObserver>(
    store: StakeStore,
    observer: O,
    retry: RetryPolicy,
    polling_sleep: Duration,
) {
    info!("Watcher started");
    loop {
        match observer.observed_stakes().await {
            Ok(stakes) => {
                let summary = register_observed(&store, stakes, &retry).await;
                info!("Watcher pass: {:?}", summary);
            }
            Err(error) => warn!("Could not fetch observed stakes: {}", error),
        }
        sleep(polling_sleep).await;
    }
}
