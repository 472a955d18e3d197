use sea_orm::entity::prelude::*;

pub const MAX_STAKER_LEN: usize = 90;
pub const MAX_TX_LEN: usize = 66;
pub const MAX_REWARD_RECEIVER_LEN: usize = 66;

/// One row per observed Bitcoin staking transaction.
///
/// Rows are only ever appended and then moved forward through
/// `finalized` and `ended`; `ended` is never set while `finalized` is false.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "stake")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub staker: String,
    #[sea_orm(unique)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
