//! Failure taxonomy for balance operations.
//!
//! Two layers: [`StoreError`] is what a ledger store reports, including
//! infrastructure detail; [`BalanceError`] is what leaves the service, where
//! everything that is not a business rule has been collapsed into an opaque
//! storage failure.

use tally_shared::AccountId;
use thiserror::Error;

/// Errors visible to callers of the balance service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// The account has no balance row.
    #[error("account {0} does not exist")]
    UnknownAccount(AccountId),

    /// The debit or transfer would make the balance negative.
    #[error("account {0} has insufficient balance")]
    InsufficientBalance(AccountId),

    /// Anything else. Details are logged, never returned.
    #[error("storage failure")]
    StorageFailure,
}

impl BalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAccount(_) => "ACCOUNT_NOT_FOUND",
            Self::InsufficientBalance(_) => "INSUFFICIENT_BALANCE",
            Self::StorageFailure => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::UnknownAccount(_) => 404,
            Self::InsufficientBalance(_) => 422,
            Self::StorageFailure => 500,
        }
    }

    /// Returns true for failures that depend only on ledger state.
    ///
    /// These are deterministic, so retrying without a state change is useless.
    #[must_use]
    pub const fn is_business_rule(&self) -> bool {
        matches!(self, Self::UnknownAccount(_) | Self::InsufficientBalance(_))
    }

    /// Account the failure is about, if any.
    #[must_use]
    pub const fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::UnknownAccount(id) | Self::InsufficientBalance(id) => Some(*id),
            Self::StorageFailure => None,
        }
    }
}

/// Errors reported by a [`LedgerStore`](super::LedgerStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The account has no balance row.
    #[error("account {0} does not exist")]
    UnknownAccount(AccountId),

    /// The balance check constraint rejected the update.
    #[error("account {0} has insufficient balance")]
    InsufficientBalance(AccountId),

    /// Connection, statement, or transaction failure.
    #[error("database error: {0}")]
    Database(String),

    /// A stored value could not be decoded.
    #[error("corrupt stored value: {0}")]
    CorruptValue(String),
}

impl StoreError {
    /// Maps the store's view onto the outward taxonomy.
    #[must_use]
    pub const fn classify(&self) -> BalanceError {
        match self {
            Self::UnknownAccount(id) => BalanceError::UnknownAccount(*id),
            Self::InsufficientBalance(id) => BalanceError::InsufficientBalance(*id),
            Self::Database(_) | Self::CorruptValue(_) => BalanceError::StorageFailure,
        }
    }
}
