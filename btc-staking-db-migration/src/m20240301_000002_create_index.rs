use btc_staking_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000002_create_index"
    }
}

pub const UNIQUE_TX: &str = "uq_stake_tx";
pub const STAKER_TX: &str = "idx_stake_staker_tx";
pub const ENDED_TX: &str = "idx_stake_ended_tx";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // the unique index is the only guard against registering a tx twice
        manager
            .create_index(
                Index::create()
                    .name(UNIQUE_TX)
                    .table(stake::Entity)
                    .col(stake::Column::Tx)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(STAKER_TX)
                    .table(stake::Entity)
                    .col(stake::Column::Staker)
                    .col(stake::Column::Tx)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name(ENDED_TX)
                    .table(stake::Entity)
                    .col(stake::Column::Ended)
                    .col(stake::Column::Tx)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [ENDED_TX, STAKER_TX, UNIQUE_TX] {
            manager
                .drop_index(Index::drop().name(name).table(stake::Entity).to_owned())
                .await?;
        }
        Ok(())
    }
}
