use crate::client::RewardIssuer;
use crate::retry::{with_backoff, RetryPolicy};
use btc_staking_store::{StakeError, StakeResult, StakeStore};
use chrono::Utc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RewardSummary {
    pub due: usize,
    pub ended: usize,
    pub failed: usize,
}

/// Issues rewards for finalized stakes whose epoch is over at `now` and ends
/// them once the issuer accepted the payout. Pages through every due stake so
/// stakes whose issuance keeps failing cannot hold back the ones after them.
pub async fn issue_due_rewards<R: RewardIssuer>(
    store: &StakeStore,
    issuer: &R,
    retry: &RetryPolicy,
    batch_size: i64,
    now: i64,
) -> StakeResult<RewardSummary> {
    let mut summary = RewardSummary::default();
    let mut after: Option<String> = None;
    loop {
        let page = store
            .query_due_unended(now, after.as_deref(), batch_size)
            .await?;
        for stake in &page {
            summary.due += 1;

            if let Err(error) = issuer.issue_reward(stake).await {
                warn!("Reward issuance failed for {}: {}", stake.tx, error);
                summary.failed += 1;
                continue;
            }

            match with_backoff(retry, || store.end(&stake.tx)).await {
                Ok(()) => summary.ended += 1,
                Err(error @ (StakeError::NotFound(_) | StakeError::PreconditionFailed { .. })) => {
                    warn!("{}", error);
                    summary.failed += 1;
                }
                Err(error) => {
                    // the stake stays open, so the next pass issues the reward again
                    // before ending it; the reward service dedupes on tx
                    error!("Could not end stake {} after reward: {:?}", stake.tx, error);
                    return Err(error);
                }
            }
        }

        if (page.len() as i64) < batch_size {
            return Ok(summary);
        }
        after = page.last().map(|stake| stake.tx.to_owned());
    }
}

pub async fn run<R: RewardIssuer>(
    store: StakeStore,
    issuer: R,
    retry: RetryPolicy,
    batch_size: i64,
    polling_sleep: Duration,
) {
    info!("Rewarder started");
    loop {
        let now = Utc::now().timestamp();
        match issue_due_rewards(&store, &issuer, &retry, batch_size, now).await {
            Ok(summary) => info!("Reward pass: {:?}", summary),
            Err(error) => warn!("Reward pass failed: {}", error),
        }
        sleep(polling_sleep).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::test_utils::{observed, store};
    use async_trait::async_trait;
    use btc_staking_store::StakeRecord;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeIssuer {
        issued: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RewardIssuer for FakeIssuer {
        async fn issue_reward(&self, stake: &StakeRecord) -> Result<(), ClientError> {
            if stake.tx == "txid-rejected" {
                return Err(ClientError::BadResponse("rejected".to_owned()));
            }
            self.issued.lock().unwrap().push(stake.tx.to_owned());
            Ok(())
        }
    }

    fn retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 2,
            base_delay: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn test_issue_due_rewards() {
        let store = store().await;
        for tx in ["txid1", "txid2", "txid-rejected"] {
            store.create(observed(tx).into()).await.unwrap();
        }
        let mut later = observed("txid-later");
        later.start = 100_000;
        store.create(later.into()).await.unwrap();
        for tx in ["txid1", "txid-rejected", "txid-later"] {
            store.finalize(tx).await.unwrap();
        }
        let issuer = FakeIssuer::default();

        // txid1 epoch ends at 1000 + 86400
        let summary = issue_due_rewards(&store, &issuer, &retry(), 10, 87_400)
            .await
            .unwrap();
        assert_eq!(
            summary,
            RewardSummary {
                due: 2,
                ended: 1,
                failed: 1,
            }
        );
        assert_eq!(*issuer.issued.lock().unwrap(), vec!["txid1".to_owned()]);
        assert!(store.find_by_tx("txid1").await.unwrap().unwrap().ended);
        assert!(!store.find_by_tx("txid2").await.unwrap().unwrap().ended);
        assert!(!store.find_by_tx("txid-rejected").await.unwrap().unwrap().ended);
        assert!(!store.find_by_tx("txid-later").await.unwrap().unwrap().ended);

        let summary = issue_due_rewards(&store, &issuer, &retry(), 10, 87_400)
            .await
            .unwrap();
        assert_eq!(summary.ended, 0);
        assert_eq!(issuer.issued.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stakes_not_yet_due_do_not_fill_the_batch() {
        let store = store().await;
        for tx in ["a1", "a2"] {
            let mut stake = observed(tx);
            stake.start = 1_000_000_000;
            store.create(stake.into()).await.unwrap();
        }
        store.create(observed("z1").into()).await.unwrap();
        for tx in ["a1", "a2", "z1"] {
            store.finalize(tx).await.unwrap();
        }
        let issuer = FakeIssuer::default();

        let summary = issue_due_rewards(&store, &issuer, &retry(), 2, 100_000)
            .await
            .unwrap();
        assert_eq!(
            summary,
            RewardSummary {
                due: 1,
                ended: 1,
                failed: 0,
            }
        );
        assert!(store.find_by_tx("z1").await.unwrap().unwrap().ended);
        assert!(!store.find_by_tx("a1").await.unwrap().unwrap().ended);
    }

    #[tokio::test]
    async fn test_failing_issuance_does_not_block_later_pages() {
        let store = store().await;
        for tx in ["txid-rejected", "z1", "z2"] {
            store.create(observed(tx).into()).await.unwrap();
            store.finalize(tx).await.unwrap();
        }
        let issuer = FakeIssuer::default();

        let summary = issue_due_rewards(&store, &issuer, &retry(), 1, 100_000)
            .await
            .unwrap();
        assert_eq!(
            summary,
            RewardSummary {
                due: 3,
                ended: 2,
                failed: 1,
            }
        );
        assert_eq!(
            *issuer.issued.lock().unwrap(),
            vec!["z1".to_owned(), "z2".to_owned()]
        );
    }

    #[tokio::test]
    async fn test_unfinalized_stakes_not_rewarded() {
        let store = store().await;
        store.create(observed("txid1").into()).await.unwrap();
        let issuer = FakeIssuer::default();

        let summary = issue_due_rewards(&store, &issuer, &retry(), 10, i64::MAX)
            .await
            .unwrap();
        assert_eq!(summary, RewardSummary::default());
        assert!(issuer.issued.lock().unwrap().is_empty());
    }
}
