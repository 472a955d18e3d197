use crate::model::StakeRecord;
use crate::store::StakeStore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Could not load stakes. Please try again later.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Storage failures are reported without their underlying detail.
    #[error("{0}")]
    Internal(&'static str),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeDetails {
    pub staker: String,
    pub tx: String,
    pub start: i64,
    pub duration: i64,
    pub amount: i64,
    pub reward_receiver: String,
    pub finalized: bool,
    pub ended: bool,
    pub btc_signature: String,
    pub receiver_signature: String,
}

impl From<StakeRecord> for StakeDetails {
    fn from(record: StakeRecord) -> Self {
        StakeDetails {
            staker: record.staker,
            tx: record.tx,
            start: record.start,
            duration: record.duration,
            amount: record.amount,
            reward_receiver: record.reward_receiver,
            finalized: record.finalized,
            ended: record.ended,
            btc_signature: record.btc_signature,
            receiver_signature: record.receiver_signature,
        }
    }
}

/// Read-only view of the stake table for the web api.
#[derive(Clone, Debug)]
pub struct StakeQueryService {
    store: StakeStore,
}

impl StakeQueryService {
    pub fn new(store: StakeStore) -> Self {
        Self { store }
    }

    pub async fn by_staker(&self, staker: &str) -> Result<Vec<StakeDetails>, QueryError> {
        match self.store.query_by_staker(staker).await {
            Ok(records) => Ok(records.into_iter().map(StakeDetails::from).collect()),
            Err(error) => {
                error!("Error fetching stakes for {}: {:?}", staker, error);
                Err(QueryError::Internal(INTERNAL_ERROR_MESSAGE))
            }
        }
    }
}
