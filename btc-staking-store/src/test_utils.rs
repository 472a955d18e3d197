use crate::{NewStake, StakeStore};
use btc_staking_db_migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};

/// A store on a fresh, migrated in-memory SQLite database.
pub async fn store() -> StakeStore {
    let mut options = ConnectOptions::new("sqlite::memory:".to_owned());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    StakeStore::new(db)
}

pub fn new_stake(staker: &str, tx: &str) -> NewStake {
    NewStake {
        staker: staker.to_owned(),
        tx: tx.to_owned(),
        start: 1000,
        duration: 86400,
        amount: 500000,
        reward_receiver: "0xdead".to_owned(),
        btc_signature: "sig1".to_owned(),
        receiver_signature: "sig2".to_owned(),
    }
}
