//! Balance and history records plus the request shapes that produce them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::EXTERNAL_ACCOUNT;
use tally_shared::{AccountId, Amount, RequestError};

/// Current balance of one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Owning account.
    #[serde(rename = "user_id")]
    pub account_id: AccountId,
    /// Current value, never negative.
    pub value: Decimal,
}

/// One committed money movement.
///
/// `from_id == 0` marks income, `to_id == 0` marks an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Insertion-ordered id.
    pub id: i64,
    /// Debited account, or `0` for external.
    pub from_id: i64,
    /// Credited account, or `0` for external.
    pub to_id: i64,
    /// Amount moved, always positive.
    pub amount: Decimal,
    /// When the movement happened.
    pub occurred_at: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

impl HistoryEntry {
    /// Returns true for a credit with no debited source.
    #[must_use]
    pub const fn is_income(&self) -> bool {
        self.from_id == EXTERNAL_ACCOUNT
    }

    /// Returns true for a debit with no credited destination.
    #[must_use]
    pub const fn is_expense(&self) -> bool {
        self.to_id == EXTERNAL_ACCOUNT
    }
}

/// History row about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHistoryEntry {
    /// Debited account, or `0` for external.
    pub from_id: i64,
    /// Credited account, or `0` for external.
    pub to_id: i64,
    /// Amount moved.
    pub amount: Amount,
    /// When the movement happened.
    pub occurred_at: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

/// Income or expense against a single account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceChange {
    /// Account whose balance changes.
    pub account_id: AccountId,
    /// Amount added or removed.
    pub amount: Amount,
    /// When the movement happened.
    pub occurred_at: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
}

impl BalanceChange {
    /// Creates a change.
    pub fn new(
        account_id: AccountId,
        amount: Amount,
        occurred_at: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            amount,
            occurred_at,
            description: description.into(),
        }
    }

    /// History row for crediting this change (external → account).
    #[must_use]
    pub fn as_income(&self) -> NewHistoryEntry {
        NewHistoryEntry {
            from_id: EXTERNAL_ACCOUNT,
            to_id: self.account_id.into_inner(),
            amount: self.amount,
            occurred_at: self.occurred_at,
            description: self.description.clone(),
        }
    }

    /// History row for debiting this change (account → external).
    #[must_use]
    pub fn as_expense(&self) -> NewHistoryEntry {
        NewHistoryEntry {
            from_id: self.account_id.into_inner(),
            to_id: EXTERNAL_ACCOUNT,
            amount: self.amount,
            occurred_at: self.occurred_at,
            description: self.description.clone(),
        }
    }
}

/// Movement of money between two distinct accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    from: AccountId,
    to: AccountId,
    amount: Amount,
    occurred_at: DateTime<Utc>,
    description: String,
}

impl TransferRequest {
    /// Creates a transfer request.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::SelfTransfer`] when `from == to`.
    pub fn new(
        from: AccountId,
        to: AccountId,
        amount: Amount,
        occurred_at: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Result<Self, RequestError> {
        if from == to {
            return Err(RequestError::SelfTransfer(from.into_inner()));
        }
        Ok(Self {
            from,
            to,
            amount,
            occurred_at,
            description: description.into(),
        })
    }

    /// Debited account.
    #[must_use]
    pub const fn source(&self) -> AccountId {
        self.from
    }

    /// Credited account.
    #[must_use]
    pub const fn destination(&self) -> AccountId {
        self.to
    }

    /// Amount moved.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// When the transfer happened.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Both accounts in ascending id order, the order their rows get locked.
    #[must_use]
    pub fn lock_order(&self) -> [AccountId; 2] {
        if self.from < self.to {
            [self.from, self.to]
        } else {
            [self.to, self.from]
        }
    }

    /// The single history row documenting this transfer.
    #[must_use]
    pub fn history_entry(&self) -> NewHistoryEntry {
        NewHistoryEntry {
            from_id: self.from.into_inner(),
            to_id: self.to.into_inner(),
            amount: self.amount,
            occurred_at: self.occurred_at,
            description: self.description.clone(),
        }
    }
}
