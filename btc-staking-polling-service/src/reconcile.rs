use crate::client::ConfirmationSource;
use btc_staking_store::{StakeError, StakeResult, StakeStore};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub checked: usize,
    pub finalized: usize,
}

/// Finalizes outstanding stakes whose Bitcoin transaction has at least
/// `required_confirmations` confirmations. Pages through every unfinalized
/// stake so shallow transactions cannot hold back the ones after them.
pub async fn finalize_confirmed<C: ConfirmationSource>(
    store: &StakeStore,
    chain: &C,
    required_confirmations: u64,
    batch_size: i64,
) -> StakeResult<ReconcileSummary> {
    let mut summary = ReconcileSummary::default();
    let mut after: Option<String> = None;
    loop {
        let page = store.query_unfinalized(after.as_deref(), batch_size).await?;
        for tx in &page {
            summary.checked += 1;

            let confirmations = match chain.confirmations(tx).await {
                Ok(Some(confirmations)) => confirmations,
                Ok(None) => {
                    warn!("Stake transaction {} unknown to bitcoin node", tx);
                    continue;
                }
                Err(error) => {
                    warn!("Could not get confirmations for {}: {}", tx, error);
                    continue;
                }
            };
            if confirmations < required_confirmations {
                continue;
            }

            match store.finalize(tx).await {
                Ok(()) => summary.finalized += 1,
                Err(error @ StakeError::NotFound(_)) => warn!("{}", error),
                Err(error) => return Err(error),
            }
        }

        if (page.len() as i64) < batch_size {
            return Ok(summary);
        }
        after = page.last().cloned();
    }
}

pub async fn run<C: ConfirmationSource>(
    store: StakeStore,
    chain: C,
    required_confirmations: u64,
    batch_size: i64,
    polling_sleep: Duration,
) {
    info!(
        "Reconciler started, finalizing at {} confirmations",
        required_confirmations
    );
    loop {
        match finalize_confirmed(&store, &chain, required_confirmations, batch_size).await {
            Ok(summary) => info!("Reconcile pass: {:?}", summary),
            Err(error) => warn!("Reconcile pass failed: {}", error),
        }
        sleep(polling_sleep).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::test_utils::store;
    use async_trait::async_trait;
    use btc_staking_store::NewStake;
    use std::collections::HashMap;

    struct FakeChain {
        confirmations: HashMap<String, u64>,
    }

    #[async_trait]
    impl ConfirmationSource for FakeChain {
        async fn confirmations(&self, tx: &str) -> Result<Option<u64>, ClientError> {
            if tx == "txid-broken" {
                return Err(ClientError::BadResponse("broken".to_owned()));
            }
            Ok(self.confirmations.get(tx).copied())
        }
    }

    fn stake(tx: &str) -> NewStake {
        crate::test_utils::observed(tx).into()
    }

    #[tokio::test]
    async fn test_finalize_confirmed() {
        let store = store().await;
        for tx in ["txid1", "txid2", "txid3", "txid-broken"] {
            store.create(stake(tx)).await.unwrap();
        }
        let chain = FakeChain {
            confirmations: HashMap::from([("txid1".to_owned(), 6), ("txid2".to_owned(), 2)]),
        };

        let summary = finalize_confirmed(&store, &chain, 6, 10).await.unwrap();
        assert_eq!(
            summary,
            ReconcileSummary {
                checked: 4,
                finalized: 1,
            }
        );
        assert!(store.find_by_tx("txid1").await.unwrap().unwrap().finalized);
        assert!(!store.find_by_tx("txid2").await.unwrap().unwrap().finalized);
        assert!(!store.find_by_tx("txid3").await.unwrap().unwrap().finalized);
    }

    #[tokio::test]
    async fn test_already_finalized_skipped() {
        let store = store().await;
        store.create(stake("txid1")).await.unwrap();
        store.finalize("txid1").await.unwrap();
        let chain = FakeChain {
            confirmations: HashMap::from([("txid1".to_owned(), 100)]),
        };

        let summary = finalize_confirmed(&store, &chain, 6, 10).await.unwrap();
        assert_eq!(summary, ReconcileSummary::default());
    }

    #[tokio::test]
    async fn test_finalized_stakes_do_not_fill_the_batch() {
        let store = store().await;
        for tx in ["a1", "a2", "z1"] {
            store.create(stake(tx)).await.unwrap();
        }
        store.finalize("a1").await.unwrap();
        store.finalize("a2").await.unwrap();
        let chain = FakeChain {
            confirmations: HashMap::from([
                ("a1".to_owned(), 100),
                ("a2".to_owned(), 100),
                ("z1".to_owned(), 100),
            ]),
        };

        let summary = finalize_confirmed(&store, &chain, 6, 2).await.unwrap();
        assert_eq!(
            summary,
            ReconcileSummary {
                checked: 1,
                finalized: 1,
            }
        );
        assert!(store.find_by_tx("z1").await.unwrap().unwrap().finalized);
    }

    #[tokio::test]
    async fn test_shallow_stakes_do_not_block_later_pages() {
        let store = store().await;
        for tx in ["b1", "b2", "b3", "z1"] {
            store.create(stake(tx)).await.unwrap();
        }
        let chain = FakeChain {
            confirmations: HashMap::from([
                ("b1".to_owned(), 1),
                ("b2".to_owned(), 1),
                ("b3".to_owned(), 1),
                ("z1".to_owned(), 6),
            ]),
        };

        let summary = finalize_confirmed(&store, &chain, 6, 2).await.unwrap();
        assert_eq!(
            summary,
            ReconcileSummary {
                checked: 4,
                finalized: 1,
            }
        );
        assert!(store.find_by_tx("z1").await.unwrap().unwrap().finalized);
        assert!(!store.find_by_tx("b1").await.unwrap().unwrap().finalized);
    }

    #[tokio::test]
    async fn test_invalid_batch_size() {
        let store = store().await;
        let chain = FakeChain {
            confirmations: HashMap::new(),
        };
        assert!(matches!(
            finalize_confirmed(&store, &chain, 6, 0).await,
            Err(StakeError::InvalidArgument(_))
        ));
    }
}
