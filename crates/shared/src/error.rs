//! Application-wide error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejections raised while building request values, before any ledger work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Account ids must be positive; `0` is reserved for "external".
    #[error("account id must be positive, got {0}")]
    InvalidAccountId(i64),

    /// Account id is not an integer.
    #[error("account id is not an integer: {0:?}")]
    MalformedAccountId(String),

    /// Amounts must be strictly positive.
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Amount has more fractional digits than balances store.
    #[error("amount {0} has more than 2 decimal places")]
    TooPrecise(Decimal),

    /// Amount does not fit the stored money column.
    #[error("amount {0} exceeds the largest storable amount")]
    TooLarge(Decimal),

    /// Source and destination of a transfer are the same account.
    #[error("cannot transfer from account {0} to itself")]
    SelfTransfer(i64),

    /// Body or query string could not be decoded.
    #[error("{0}")]
    Malformed(String),
}

impl RequestError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "VALIDATION_ERROR"
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_request_errors_are_validation_failures() {
        let errors = [
            RequestError::InvalidAccountId(0),
            RequestError::MalformedAccountId("abc".to_string()),
            RequestError::NonPositiveAmount(dec!(-1)),
            RequestError::TooPrecise(dec!(0.001)),
            RequestError::TooLarge(dec!(1000000000000000000)),
            RequestError::SelfTransfer(7),
            RequestError::Malformed("expected value".to_string()),
        ];
        for err in errors {
            assert_eq!(err.error_code(), "VALIDATION_ERROR");
            assert_eq!(err.http_status_code(), 400);
        }
    }

    #[test]
    fn test_request_error_messages() {
        assert_eq!(
            RequestError::NonPositiveAmount(dec!(-1)).to_string(),
            "amount must be positive, got -1"
        );
        assert_eq!(
            RequestError::SelfTransfer(7).to_string(),
            "cannot transfer from account 7 to itself"
        );
        assert_eq!(
            RequestError::TooLarge(dec!(1000000000000000000)).to_string(),
            "amount 1000000000000000000 exceeds the largest storable amount"
        );
    }
}
