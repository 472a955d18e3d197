use sea_orm::DbErr;
use thiserror::Error;

/// Rejected input, caught before the database is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tx must not be empty")]
    EmptyTx,

    #[error("tx is {len} characters, at most {max} allowed")]
    TxTooLong { len: usize, max: usize },

    #[error("staker must not be empty")]
    EmptyStaker,

    #[error("staker is {len} characters, at most {max} allowed")]
    StakerTooLong { len: usize, max: usize },

    #[error("reward receiver is {len} characters, at most {max} allowed")]
    RewardReceiverTooLong { len: usize, max: usize },

    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(i64),

    #[error("duration must be positive, got {0}")]
    NonPositiveDuration(i64),
}

#[derive(Debug, Error)]
pub enum StakeError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The tx is already registered. Watchers treat this as success.
    #[error("duplicate transaction: {0}")]
    DuplicateTransaction(String),

    #[error("stake not found: {0}")]
    NotFound(String),

    #[error("precondition failed for {tx}: {reason}")]
    PreconditionFailed { tx: String, reason: &'static str },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] DbErr),
}

impl StakeError {
    /// Only transport failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StakeError::StoreUnavailable(_))
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StakeError::Validation(_) | StakeError::InvalidArgument(_)
        )
    }
}

pub type StakeResult<T> = Result<T, StakeError>;
