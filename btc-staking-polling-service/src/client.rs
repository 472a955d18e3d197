use async_trait::async_trait;
use btc_staking_store::{NewStake, StakeRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rpc {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("bad response: {0}")]
    BadResponse(String),
}

/// A staking transaction seen on the Bitcoin chain.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservedStake {
    pub staker: String,
    pub tx: String,
    pub start: i64,
    pub duration: i64,
    pub amount: i64,
    pub reward_receiver: String,
    pub btc_signature: String,
    pub receiver_signature: String,
}

impl From<ObservedStake> for NewStake {
    fn from(stake: ObservedStake) -> Self {
        NewStake {
            staker: stake.staker,
            tx: stake.tx,
            start: stake.start,
            duration: stake.duration,
            amount: stake.amount,
            reward_receiver: stake.reward_receiver,
            btc_signature: stake.btc_signature,
            receiver_signature: stake.receiver_signature,
        }
    }
}

#[async_trait]
pub trait StakeObserver: Send + Sync {
    async fn observed_stakes(&self) -> Result<Vec<ObservedStake>, ClientError>;
}

#[async_trait]
pub trait ConfirmationSource: Send + Sync {
    /// `None` when the chain does not know the transaction.
    async fn confirmations(&self, tx: &str) -> Result<Option<u64>, ClientError>;
}

#[async_trait]
pub trait RewardIssuer: Send + Sync {
    async fn issue_reward(&self, stake: &StakeRecord) -> Result<(), ClientError>;
}
