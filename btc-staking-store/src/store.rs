use crate::config::{get_db_connection, StoreConfig};
use crate::error::{StakeError, StakeResult};
use crate::model::{NewStake, RecordId, StakeRecord};
use btc_staking_db_entity::db::stake::{Column as StakeColumn, Entity as Stake};
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, RuntimeErr,
};
use tracing::{debug, error, info, warn};

const PG_UNIQUE_VIOLATION: &str = "23505";
const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";

/// Sole writer of the `stake` table.
///
/// Holds a pooled connection; clones share the pool. Concurrency control is
/// left to the database: the unique index on `tx` deduplicates registrations
/// and lifecycle changes are conditional single-statement updates.
#[derive(Clone, Debug)]
pub struct StakeStore {
    db: DatabaseConnection,
}

impl StakeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn connect(config: &StoreConfig) -> StakeResult<Self> {
        let db = get_db_connection(config).await?;
        Ok(Self::new(db))
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Registers a stake. A tx that is already stored yields
    /// [`StakeError::DuplicateTransaction`], reported by the unique index
    /// rather than looked up first, so concurrent watchers cannot both win.
    pub async fn create(&self, stake: NewStake) -> StakeResult<RecordId> {
        stake.validate()?;
        let tx = stake.tx.to_owned();
        match Stake::insert(stake.into_active_model()).exec(&self.db).await {
            Ok(result) => {
                info!("Registered stake {} as {}", tx, result.last_insert_id);
                Ok(result.last_insert_id)
            }
            Err(db_error) if is_unique_violation(&db_error) => {
                debug!("Stake {} already registered", tx);
                Err(StakeError::DuplicateTransaction(tx))
            }
            Err(db_error) => {
                error!("Could not insert stake {}: {:?}", tx, db_error);
                Err(StakeError::StoreUnavailable(db_error))
            }
        }
    }

    /// Marks the stake's Bitcoin transaction as final. Safe to repeat.
    pub async fn finalize(&self, tx: &str) -> StakeResult<()> {
        let result = Stake::update_many()
            .col_expr(StakeColumn::Finalized, Expr::value(true))
            .filter(StakeColumn::Tx.eq(tx))
            .filter(StakeColumn::Finalized.eq(false))
            .exec(&self.db)
            .await?;
        if result.rows_affected > 0 {
            info!("Finalized stake {}", tx);
            return Ok(());
        }

        match self.find_by_tx(tx).await? {
            Some(_) => {
                debug!("Stake {} already finalized", tx);
                Ok(())
            }
            None => {
                warn!("Finalize of unknown stake {}", tx);
                Err(StakeError::NotFound(tx.to_owned()))
            }
        }
    }

    /// Marks the stake's reward as settled. Only a finalized stake can end.
    pub async fn end(&self, tx: &str) -> StakeResult<()> {
        let result = Stake::update_many()
            .col_expr(StakeColumn::Ended, Expr::value(true))
            .filter(StakeColumn::Tx.eq(tx))
            .filter(StakeColumn::Finalized.eq(true))
            .filter(StakeColumn::Ended.eq(false))
            .exec(&self.db)
            .await?;
        if result.rows_affected > 0 {
            info!("Ended stake {}", tx);
            return Ok(());
        }

        match self.find_by_tx(tx).await? {
            Some(record) if !record.finalized => {
                warn!("End of stake {} requested before finalization", tx);
                Err(StakeError::PreconditionFailed {
                    tx: tx.to_owned(),
                    reason: "stake is not finalized",
                })
            }
            Some(_) => {
                debug!("Stake {} already ended", tx);
                Ok(())
            }
            None => {
                warn!("End of unknown stake {}", tx);
                Err(StakeError::NotFound(tx.to_owned()))
            }
        }
    }

    pub async fn find_by_tx(&self, tx: &str) -> StakeResult<Option<StakeRecord>> {
        let record = Stake::find()
            .filter(StakeColumn::Tx.eq(tx))
            .one(&self.db)
            .await?;
        Ok(record)
    }

    /// All stakes of `staker` in insertion order.
    pub async fn query_by_staker(&self, staker: &str) -> StakeResult<Vec<StakeRecord>> {
        if staker.is_empty() {
            return Ok(vec![]);
        }
        let records = Stake::find()
            .filter(StakeColumn::Staker.eq(staker))
            .order_by_asc(StakeColumn::Id)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Up to `limit` txids of stakes that have not ended, ordered by tx.
    pub async fn query_pending(&self, limit: i64) -> StakeResult<Vec<String>> {
        let limit = check_limit(limit)?;
        let records = Stake::find()
            .filter(StakeColumn::Ended.eq(false))
            .order_by_asc(StakeColumn::Tx)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(records.into_iter().map(|record| record.tx).collect())
    }

    /// Up to `limit` stakes that are finalized and still awaiting their reward.
    pub async fn query_finalized_unended(&self, limit: i64) -> StakeResult<Vec<StakeRecord>> {
        let limit = check_limit(limit)?;
        let records = Stake::find()
            .filter(StakeColumn::Ended.eq(false))
            .filter(StakeColumn::Finalized.eq(true))
            .order_by_asc(StakeColumn::Tx)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(records)
    }

    /// Up to `limit` txids still waiting for finalization, ordered by tx and
    /// starting after `after` so callers can page past stakes that stay
    /// unconfirmed.
    pub async fn query_unfinalized(
        &self,
        after: Option<&str>,
        limit: i64,
    ) -> StakeResult<Vec<String>> {
        let limit = check_limit(limit)?;
        let mut select = Stake::find()
            .filter(StakeColumn::Ended.eq(false))
            .filter(StakeColumn::Finalized.eq(false));
        if let Some(after) = after {
            select = select.filter(StakeColumn::Tx.gt(after));
        }
        let records = select
            .order_by_asc(StakeColumn::Tx)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(records.into_iter().map(|record| record.tx).collect())
    }

    /// Up to `limit` finalized, unended stakes whose epoch (`start + duration`)
    /// is over at `now`, ordered by tx and starting after `after`.
    pub async fn query_due_unended(
        &self,
        now: i64,
        after: Option<&str>,
        limit: i64,
    ) -> StakeResult<Vec<StakeRecord>> {
        let limit = check_limit(limit)?;
        let mut select = Stake::find()
            .filter(StakeColumn::Ended.eq(false))
            .filter(StakeColumn::Finalized.eq(true))
            .filter(
                Expr::expr(Expr::col(StakeColumn::Start).add(Expr::col(StakeColumn::Duration)))
                    .lte(now),
            );
        if let Some(after) = after {
            select = select.filter(StakeColumn::Tx.gt(after));
        }
        let records = select
            .order_by_asc(StakeColumn::Tx)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(records)
    }
}

fn check_limit(limit: i64) -> StakeResult<u64> {
    if limit <= 0 {
        return Err(StakeError::InvalidArgument(format!(
            "limit must be positive, got {}",
            limit
        )));
    }
    Ok(limit as u64)
}

fn is_unique_violation(db_error: &DbErr) -> bool {
    let sqlx_error = match db_error {
        DbErr::Exec(RuntimeErr::SqlxError(error)) | DbErr::Query(RuntimeErr::SqlxError(error)) => {
            error
        }
        _ => return false,
    };
    match sqlx_error.as_database_error() {
        Some(database_error) => {
            matches!(
                database_error.code().as_deref(),
                Some(PG_UNIQUE_VIOLATION)
                    | Some(SQLITE_CONSTRAINT_UNIQUE)
                    | Some(SQLITE_CONSTRAINT_PRIMARYKEY)
            ) || database_error.message().starts_with("UNIQUE constraint failed")
        }
        None => false,
    }
}
