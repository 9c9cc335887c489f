//! In-memory ledger store for unit and property tests.
//!
//! Each call works on a copy of the state and swaps it in only after every
//! step succeeded, which mirrors a committed store transaction.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tally_shared::AccountId;

use super::error::StoreError;
use super::store::LedgerStore;
use super::types::{Balance, BalanceChange, HistoryEntry, NewHistoryEntry, TransferRequest};

#[derive(Debug, Clone, Default)]
struct Ledger {
    balances: BTreeMap<AccountId, Decimal>,
    history: Vec<HistoryEntry>,
}

impl Ledger {
    fn append(&mut self, entry: NewHistoryEntry) {
        let id = i64::try_from(self.history.len()).unwrap_or(i64::MAX) + 1;
        self.history.push(HistoryEntry {
            id,
            from_id: entry.from_id,
            to_id: entry.to_id,
            amount: entry.amount.value(),
            occurred_at: entry.occurred_at,
            description: entry.description,
        });
    }

    fn credit(
        &mut self,
        account: AccountId,
        amount: Decimal,
        fail_for: Option<AccountId>,
    ) -> Result<(), StoreError> {
        if fail_for == Some(account) {
            return Err(StoreError::Database(format!(
                "injected fault crediting {account}"
            )));
        }
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
        Ok(())
    }

    fn debit(&mut self, account: AccountId, amount: Decimal) -> Result<(), StoreError> {
        let value = self
            .balances
            .get_mut(&account)
            .ok_or(StoreError::UnknownAccount(account))?;
        let next = *value - amount;
        if next < Decimal::ZERO {
            return Err(StoreError::InsufficientBalance(account));
        }
        *value = next;
        Ok(())
    }
}

/// Test double for [`LedgerStore`].
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    ledger: Mutex<Ledger>,
    fail_credit_to: Mutex<Option<AccountId>>,
    stall: Mutex<Duration>,
}

impl InMemoryLedgerStore {
    /// Committed history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }

    /// Makes every credit of `account` fail with a database error.
    pub fn fail_credits_to(&self, account: AccountId) {
        *self.fail_credit_to.lock().unwrap_or_else(PoisonError::into_inner) = Some(account);
    }

    /// Delays every commit by `delay`, keeping the staged copy open meanwhile.
    pub fn stall_for(&self, delay: Duration) {
        *self.stall.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    async fn apply(
        &self,
        work: impl FnOnce(&mut Ledger, Option<AccountId>) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let fail_for = *self.fail_credit_to.lock().unwrap_or_else(PoisonError::into_inner);
        let mut staged = self.ledger.lock().unwrap_or_else(PoisonError::into_inner).clone();
        work(&mut staged, fail_for)?;

        let stall = *self.stall.lock().unwrap_or_else(PoisonError::into_inner);
        if !stall.is_zero() {
            tokio::time::sleep(stall).await;
        }

        *self.ledger.lock().unwrap_or_else(PoisonError::into_inner) = staged;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn credit(&self, change: &BalanceChange) -> Result<(), StoreError> {
        self.apply(|ledger, fail_for| {
            ledger.append(change.as_income());
            ledger.credit(change.account_id, change.amount.value(), fail_for)
        })
        .await
    }

    async fn debit(&self, change: &BalanceChange) -> Result<(), StoreError> {
        self.apply(|ledger, _| {
            ledger.append(change.as_expense());
            ledger.debit(change.account_id, change.amount.value())
        })
        .await
    }

    async fn transfer(&self, request: &TransferRequest) -> Result<(), StoreError> {
        self.apply(|ledger, fail_for| {
            ledger.append(request.history_entry());
            ledger.debit(request.source(), request.amount().value())?;
            ledger.credit(request.destination(), request.amount().value(), fail_for)
        })
        .await
    }

    async fn get_balance(&self, account_id: AccountId) -> Result<Balance, StoreError> {
        let ledger = self.ledger.lock().unwrap_or_else(PoisonError::into_inner);
        ledger
            .balances
            .get(&account_id)
            .map(|value| Balance {
                account_id,
                value: *value,
            })
            .ok_or(StoreError::UnknownAccount(account_id))
    }
}
