//! Account identifiers.
//!
//! Accounts are keyed by a positive 64-bit integer. Id `0` is reserved: in
//! history rows it stands for "external", the missing side of an income or
//! an expense, so it never names a real account.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Raw id written into history rows for the external side of a movement.
pub const EXTERNAL_ACCOUNT: i64 = 0;

/// Identifier of an account that owns a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AccountId(i64);

impl AccountId {
    /// Creates an account id, rejecting zero and negative values.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidAccountId`] when `raw <= 0`.
    pub const fn new(raw: i64) -> Result<Self, RequestError> {
        if raw <= EXTERNAL_ACCOUNT {
            return Err(RequestError::InvalidAccountId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the inner integer.
    #[must_use]
    pub const fn into_inner(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for AccountId {
    type Error = RequestError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<AccountId> for i64 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| RequestError::MalformedAccountId(s.to_string()))?;
        Self::new(raw)
    }
}
