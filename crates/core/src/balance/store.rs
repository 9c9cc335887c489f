//! Port to the durable ledger.

use async_trait::async_trait;
use tally_shared::AccountId;

use super::error::StoreError;
use super::types::{Balance, BalanceChange, TransferRequest};

/// Durable balance table plus append-only history.
///
/// Every mutating call runs in exactly one store transaction: the history row
/// is written first, then the balance rows, then the transaction commits. Any
/// failure, or dropping the returned future before it completes, must leave
/// neither the history row nor any balance effect behind.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Adds `change.amount` to the account, creating its row when absent.
    async fn credit(&self, change: &BalanceChange) -> Result<(), StoreError>;

    /// Removes `change.amount` from an existing account.
    async fn debit(&self, change: &BalanceChange) -> Result<(), StoreError>;

    /// Debits the source and credits the destination in one unit.
    async fn transfer(&self, request: &TransferRequest) -> Result<(), StoreError>;

    /// Reads the current balance of an existing account.
    async fn get_balance(&self, account_id: AccountId) -> Result<Balance, StoreError>;
}
