use crate::client::{ClientError, RewardIssuer};
use async_trait::async_trait;
use btc_staking_store::StakeRecord;
use serde::Serialize;
use tracing::info;

/// Calls the reward-chain issuing service.
pub struct RewardService {
    client: reqwest::Client,
    node: String,
}

/// Payout request for one stake.
///
/// `tx` is the idempotency key: a stake whose `end` failed after a payout is
/// sent again on the next pass, and the reward service must pay each tx once.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IssueRewardRequest<'a> {
    pub tx: &'a str,
    pub reward_receiver: &'a str,
    pub receiver_signature: &'a str,
    pub amount: i64,
    pub start: i64,
    pub duration: i64,
}

impl<'a> From<&'a StakeRecord> for IssueRewardRequest<'a> {
    fn from(stake: &'a StakeRecord) -> Self {
        IssueRewardRequest {
            tx: &stake.tx,
            reward_receiver: &stake.reward_receiver,
            receiver_signature: &stake.receiver_signature,
            amount: stake.amount,
            start: stake.start,
            duration: stake.duration,
        }
    }
}

impl RewardService {
    pub fn new(client: reqwest::Client, node: String) -> Self {
        RewardService { client, node }
    }
}

#[async_trait]
impl RewardIssuer for RewardService {
    async fn issue_reward(&self, stake: &StakeRecord) -> Result<(), ClientError> {
        let url = self.node.to_owned() + "/issue_reward";
        self.client
            .post(&url)
            .json(&IssueRewardRequest::from(stake))
            .send()
            .await?
            .error_for_status()?;
        info!("Reward issued for {} to {}", stake.tx, stake.reward_receiver);
        Ok(())
    }
}
