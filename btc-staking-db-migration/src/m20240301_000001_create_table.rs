use btc_staking_db_entity::db::*;
use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20240301_000001_create_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(stake::Entity)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(stake::Column::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(stake::Column::Staker)
                            .string_len(stake::MAX_STAKER_LEN as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(stake::Column::Tx)
                            .string_len(stake::MAX_TX_LEN as u32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(stake::Column::Start).big_integer().not_null())
                    .col(
                        ColumnDef::new(stake::Column::Duration)
                            .big_integer()
                            .not_null()
                            .extra("CHECK (duration > 0)".to_owned()),
                    )
                    .col(
                        ColumnDef::new(stake::Column::Amount)
                            .big_integer()
                            .not_null()
                            .extra("CHECK (amount > 0)".to_owned()),
                    )
                    .col(
                        ColumnDef::new(stake::Column::RewardReceiver)
                            .string_len(stake::MAX_REWARD_RECEIVER_LEN as u32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(stake::Column::Finalized)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(stake::Column::Ended)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(stake::Column::BtcSignature).text().not_null())
                    .col(
                        ColumnDef::new(stake::Column::ReceiverSignature)
                            .text()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(stake::Entity).to_owned())
            .await
    }
}
