use crate::error::ValidationError;
use btc_staking_db_entity::db::stake::{self, MAX_REWARD_RECEIVER_LEN, MAX_STAKER_LEN, MAX_TX_LEN};
use sea_orm::ActiveValue;

pub type RecordId = i32;

pub type StakeRecord = stake::Model;

/// A stake as reported by the watcher, before it is stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStake {
    pub staker: String,
    pub tx: String,
    pub start: i64,
    pub duration: i64,
    pub amount: i64,
    pub reward_receiver: String,
    pub btc_signature: String,
    pub receiver_signature: String,
}

impl NewStake {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let tx_len = self.tx.chars().count();
        if tx_len == 0 {
            return Err(ValidationError::EmptyTx);
        }
        if tx_len > MAX_TX_LEN {
            return Err(ValidationError::TxTooLong {
                len: tx_len,
                max: MAX_TX_LEN,
            });
        }

        let staker_len = self.staker.chars().count();
        if staker_len == 0 {
            return Err(ValidationError::EmptyStaker);
        }
        if staker_len > MAX_STAKER_LEN {
            return Err(ValidationError::StakerTooLong {
                len: staker_len,
                max: MAX_STAKER_LEN,
            });
        }

        let receiver_len = self.reward_receiver.chars().count();
        if receiver_len > MAX_REWARD_RECEIVER_LEN {
            return Err(ValidationError::RewardReceiverTooLong {
                len: receiver_len,
                max: MAX_REWARD_RECEIVER_LEN,
            });
        }

        if self.amount <= 0 {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        if self.duration <= 0 {
            return Err(ValidationError::NonPositiveDuration(self.duration));
        }
        Ok(())
    }

    /// Every new row starts neither finalized nor ended.
    pub(crate) fn into_active_model(self) -> stake::ActiveModel {
        stake::ActiveModel {
            id: ActiveValue::NotSet,
            staker: ActiveValue::Set(self.staker),
            tx: ActiveValue::Set(self.tx),
            start: ActiveValue::Set(self.start),
            duration: ActiveValue::Set(self.duration),
            amount: ActiveValue::Set(self.amount),
            reward_receiver: ActiveValue::Set(self.reward_receiver),
            finalized: ActiveValue::Set(false),
            ended: ActiveValue::Set(false),
            btc_signature: ActiveValue::Set(self.btc_signature),
            receiver_signature: ActiveValue::Set(self.receiver_signature),
        }
    }
}
