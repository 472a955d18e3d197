//! Storage and lifecycle of Bitcoin stake records.
//!
//! A stake is registered once per Bitcoin transaction, finalized once the
//! transaction is deep enough on chain and ended once its reward has been
//! settled on the reward chain. [`StakeStore`] is the only writer of the
//! `stake` table; [`StakeQueryService`] is the read side handed to the web api.

pub mod config;
pub mod error;
pub mod model;
pub mod query;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use btc_staking_db_entity::db;
pub use config::StoreConfig;
pub use error::{StakeError, StakeResult, ValidationError};
pub use model::{NewStake, RecordId, StakeRecord};
pub use query::{QueryError, StakeDetails, StakeQueryService};
pub use store::StakeStore;
