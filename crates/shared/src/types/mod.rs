//! Common value types used across the application.

pub mod id;
pub mod money;

pub use id::{AccountId, EXTERNAL_ACCOUNT};
pub use money::{AMOUNT_LIMIT, Amount, MONEY_SCALE};
