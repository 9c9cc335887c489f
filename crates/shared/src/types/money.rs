//! Positive money amounts with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Number of fractional digits stored for balances and history amounts.
pub const MONEY_SCALE: u32 = 2;

/// Smallest amount that no longer fits `NUMERIC(20, 2)`: 10^18.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// A strictly positive amount of money moved by one operation.
///
/// Direction is carried by the operation (credit, debit, transfer), never by
/// the sign of the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Creates an amount.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NonPositiveAmount`] for zero or negative values
    /// and [`RequestError::TooPrecise`] when more than [`MONEY_SCALE`]
    /// significant fractional digits are given. Returns
    /// [`RequestError::TooLarge`] from [`AMOUNT_LIMIT`] upwards.
    pub fn new(value: Decimal) -> Result<Self, RequestError> {
        if value <= Decimal::ZERO {
            return Err(RequestError::NonPositiveAmount(value));
        }
        if value >= AMOUNT_LIMIT {
            return Err(RequestError::TooLarge(value));
        }
        let normalized = value.normalize();
        if normalized.scale() > MONEY_SCALE {
            return Err(RequestError::TooPrecise(value));
        }
        Ok(Self(value))
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = RequestError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
