//! Ledger repository: the PostgreSQL implementation of [`LedgerStore`].
//!
//! Each mutation opens one database transaction, inserts the history row
//! first, then touches the balance rows, then commits. `DatabaseTransaction`
//! rolls back when dropped, so any early return (including a dropped future)
//! leaves nothing behind.
//!
//! Concurrent writers to the same account serialize on the PostgreSQL row
//! lock taken by `UPDATE` or `SELECT ... FOR UPDATE`. Transfers lock both
//! rows up front in ascending account id order, so two transfers running in
//! opposite directions between the same pair cannot deadlock.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, RuntimeErr, Set, TransactionTrait,
};
use tally_core::balance::{
    Balance, BalanceChange, HistoryEntry, LedgerStore, NewHistoryEntry, StoreError,
    TransferRequest,
};
use tally_shared::AccountId;
use tracing::debug;

use crate::entities::{balances, history};

/// SQLSTATE raised when a CHECK constraint rejects a row.
const CHECK_VIOLATION: &str = "23514";

/// Ledger repository backed by the `balances` and `history` tables.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the history rows touching `account_id`, oldest first.
    ///
    /// Read-only inspection helper for audits and tests. It is not part of
    /// [`LedgerStore`] and the service never calls it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history_for_account(
        &self,
        account_id: AccountId,
        limit: u64,
    ) -> Result<Vec<HistoryEntry>, StoreError> {
        let raw = account_id.into_inner();
        let rows = history::Entity::find()
            .filter(
                Condition::any()
                    .add(history::Column::FromId.eq(raw))
                    .add(history::Column::ToId.eq(raw)),
            )
            .order_by_asc(history::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(rows.into_iter().map(history_entry).collect())
    }

    /// Appends a history row inside `txn`.
    async fn insert_history(
        txn: &DatabaseTransaction,
        entry: NewHistoryEntry,
    ) -> Result<(), StoreError> {
        let row = history::ActiveModel {
            from_id: Set(entry.from_id),
            to_id: Set(entry.to_id),
            amount: Set(entry.amount.value()),
            occurred_at: Set(entry.occurred_at.into()),
            description: Set(entry.description),
            ..Default::default()
        };

        history::Entity::insert(row)
            .exec_without_returning(txn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Checks whether `account_id` has a balance row, as seen by `txn`.
    async fn account_exists(
        txn: &DatabaseTransaction,
        account_id: AccountId,
    ) -> Result<bool, StoreError> {
        let row = balances::Entity::find_by_id(account_id.into_inner())
            .one(txn)
            .await
            .map_err(storage_error)?;
        Ok(row.is_some())
    }

    /// Adds `amount` to the account, inserting the row when absent.
    ///
    /// `ON CONFLICT` turns a racing first credit into an increment instead of
    /// a unique violation.
    async fn upsert_credit(
        txn: &DatabaseTransaction,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), StoreError> {
        let row = balances::ActiveModel {
            account_id: Set(account_id.into_inner()),
            value: Set(amount),
        };

        balances::Entity::insert(row)
            .on_conflict(
                OnConflict::column(balances::Column::AccountId)
                    .value(
                        balances::Column::Value,
                        Expr::col((balances::Entity, balances::Column::Value)).add(amount),
                    )
                    .to_owned(),
            )
            .exec_without_returning(txn)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Subtracts `amount` from an existing account.
    ///
    /// The non-negative CHECK constraint is the only overdraft guard.
    async fn apply_debit(
        txn: &DatabaseTransaction,
        account_id: AccountId,
        amount: Decimal,
    ) -> Result<(), StoreError> {
        let result = balances::Entity::update_many()
            .col_expr(
                balances::Column::Value,
                Expr::col(balances::Column::Value).sub(amount),
            )
            .filter(balances::Column::AccountId.eq(account_id.into_inner()))
            .exec(txn)
            .await
            .map_err(|err| {
                if is_check_violation(&err) {
                    StoreError::InsufficientBalance(account_id)
                } else {
                    storage_error(err)
                }
            })?;

        if result.rows_affected == 0 {
            return Err(StoreError::UnknownAccount(account_id));
        }
        Ok(())
    }

    /// Locks the existing balance rows of both transfer sides in ascending
    /// id order and returns the ids that exist.
    async fn lock_transfer_rows(
        txn: &DatabaseTransaction,
        request: &TransferRequest,
    ) -> Result<Vec<i64>, StoreError> {
        let ids = request.lock_order().map(AccountId::into_inner);
        let rows = balances::Entity::find()
            .filter(balances::Column::AccountId.is_in(ids))
            .order_by_asc(balances::Column::AccountId)
            .lock_exclusive()
            .all(txn)
            .await
            .map_err(storage_error)?;

        Ok(rows.into_iter().map(|row| row.account_id).collect())
    }

    async fn begin(&self) -> Result<DatabaseTransaction, StoreError> {
        self.db.begin().await.map_err(storage_error)
    }
}

#[async_trait]
impl LedgerStore for LedgerRepository {
    async fn credit(&self, change: &BalanceChange) -> Result<(), StoreError> {
        let txn = self.begin().await?;

        Self::insert_history(&txn, change.as_income()).await?;
        let existed = Self::account_exists(&txn, change.account_id).await?;
        Self::upsert_credit(&txn, change.account_id, change.amount.value()).await?;

        txn.commit().await.map_err(storage_error)?;

        if !existed {
            debug!(account_id = %change.account_id, "Opened balance for new account");
        }
        Ok(())
    }

    async fn debit(&self, change: &BalanceChange) -> Result<(), StoreError> {
        let txn = self.begin().await?;

        Self::insert_history(&txn, change.as_expense()).await?;
        if !Self::account_exists(&txn, change.account_id).await? {
            return Err(StoreError::UnknownAccount(change.account_id));
        }
        Self::apply_debit(&txn, change.account_id, change.amount.value()).await?;

        txn.commit().await.map_err(storage_error)
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<(), StoreError> {
        let txn = self.begin().await?;

        Self::insert_history(&txn, request.history_entry()).await?;

        let existing = Self::lock_transfer_rows(&txn, request).await?;
        let source = request.source();
        if !existing.contains(&source.into_inner()) {
            return Err(StoreError::UnknownAccount(source));
        }

        let amount = request.amount().value();
        Self::apply_debit(&txn, source, amount).await?;
        Self::upsert_credit(&txn, request.destination(), amount).await?;

        txn.commit().await.map_err(storage_error)?;

        if !existing.contains(&request.destination().into_inner()) {
            debug!(account_id = %request.destination(), "Opened balance for new account");
        }
        Ok(())
    }

    async fn get_balance(&self, account_id: AccountId) -> Result<Balance, StoreError> {
        let row = balances::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?
            .ok_or(StoreError::UnknownAccount(account_id))?;

        Ok(Balance {
            account_id,
            value: row.value,
        })
    }
}

fn history_entry(row: history::Model) -> HistoryEntry {
    HistoryEntry {
        id: row.id,
        from_id: row.from_id,
        to_id: row.to_id,
        amount: row.amount,
        occurred_at: row.occurred_at.with_timezone(&Utc),
        description: row.description,
    }
}

/// Returns the sqlx error underneath a `DbErr`, if there is one.
fn sqlx_error(err: &DbErr) -> Option<&sqlx::Error> {
    match err {
        DbErr::Conn(RuntimeErr::SqlxError(inner))
        | DbErr::Exec(RuntimeErr::SqlxError(inner))
        | DbErr::Query(RuntimeErr::SqlxError(inner)) => Some(inner),
        _ => None,
    }
}

fn is_check_violation(err: &DbErr) -> bool {
    sqlx_error(err)
        .and_then(sqlx::Error::as_database_error)
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == CHECK_VIOLATION)
}

/// Maps any other database failure onto the store taxonomy.
///
/// Values that cannot be decoded are reported as corrupt data.
fn storage_error(err: DbErr) -> StoreError {
    let corrupt = matches!(err, DbErr::Type(_) | DbErr::TryIntoErr { .. })
        || matches!(sqlx_error(&err), Some(sqlx::Error::ColumnDecode { .. }));

    if corrupt {
        StoreError::CorruptValue(err.to_string())
    } else {
        StoreError::Database(err.to_string())
    }
}
