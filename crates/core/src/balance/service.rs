//! Balance service: the single entry point transport adapters call.
//!
//! The service owns no state besides the store handle. It bounds every store
//! call with a deadline and narrows store failures to [`BalanceError`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tally_shared::AccountId;
use tracing::{debug, error, warn};

use super::error::{BalanceError, StoreError};
use super::store::LedgerStore;
use super::types::{Balance, BalanceChange, TransferRequest};

/// Deadline used when none is configured.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Orchestrates ledger store calls and classifies their failures.
#[derive(Clone)]
pub struct BalanceService {
    store: Arc<dyn LedgerStore>,
    timeout: Duration,
}

impl std::fmt::Debug for BalanceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BalanceService {
    /// Creates a service over `store` with the default deadline.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Replaces the per-operation deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Credits an account with external money, opening it if needed.
    pub async fn add_income(&self, change: BalanceChange) -> Result<(), BalanceError> {
        self.run("add_income", self.store.credit(&change)).await?;
        debug!(account_id = %change.account_id, amount = %change.amount, "Income recorded");
        Ok(())
    }

    /// Debits an existing account to the outside.
    pub async fn add_expense(&self, change: BalanceChange) -> Result<(), BalanceError> {
        self.run("add_expense", self.store.debit(&change)).await?;
        debug!(account_id = %change.account_id, amount = %change.amount, "Expense recorded");
        Ok(())
    }

    /// Moves money between two accounts atomically.
    pub async fn transfer(&self, request: TransferRequest) -> Result<(), BalanceError> {
        self.run("transfer", self.store.transfer(&request)).await?;
        debug!(
            from_id = %request.source(),
            to_id = %request.destination(),
            amount = %request.amount(),
            "Transfer recorded"
        );
        Ok(())
    }

    /// Returns the current balance of an account.
    pub async fn get_balance(&self, account_id: AccountId) -> Result<Balance, BalanceError> {
        self.run("get_balance", self.store.get_balance(account_id))
            .await
    }

    /// Awaits a store call under the deadline.
    ///
    /// On expiry the store future is dropped, which releases its open
    /// transaction without committing.
    async fn run<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, BalanceError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(classify(operation, &err)),
            Err(_) => {
                error!(
                    operation,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "Balance operation timed out, transaction abandoned"
                );
                Err(BalanceError::StorageFailure)
            }
        }
    }
}

/// Logs a store failure and returns its outward classification.
fn classify(operation: &'static str, err: &StoreError) -> BalanceError {
    let classified = err.classify();
    match classified.account_id() {
        Some(account_id) => warn!(operation, %account_id, error = %err, "Balance operation rejected"),
        None => error!(operation, error = %err, "Balance operation failed"),
    }
    classified
}
