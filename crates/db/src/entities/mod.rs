//! `SeaORM` entity definitions.

pub mod balances;
pub mod history;
