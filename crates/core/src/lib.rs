//! Core business logic for Tally.
//!
//! This crate contains the balance rules with ZERO web or database
//! dependencies. Persistence is reached only through the
//! [`balance::LedgerStore`] trait.
//!
//! # Modules
//!
//! - `balance` - Balance records, error taxonomy, store port and service

pub mod balance;
