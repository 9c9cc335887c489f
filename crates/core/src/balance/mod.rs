//! Balance mutation engine.
//!
//! This module implements the account balance functionality:
//! - Balance and history records, income/expense and transfer requests
//! - The two-level error taxonomy (store failures, service failures)
//! - The `LedgerStore` port implemented by the database layer
//! - The `BalanceService` consumed by transport adapters

pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod testing;

pub use error::{BalanceError, StoreError};
pub use service::{BalanceService, DEFAULT_OPERATION_TIMEOUT};
pub use store::LedgerStore;
pub use types::{Balance, BalanceChange, HistoryEntry, NewHistoryEntry, TransferRequest};
