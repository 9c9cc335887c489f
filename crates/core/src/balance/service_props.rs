//! Property-based tests for BalanceService.
//!
//! - Exact decimal arithmetic across repeated credits and debits
//! - Rejected debits leave the balance untouched
//! - Transfers conserve the total and write exactly one history row

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::{AccountId, Amount};

use super::error::BalanceError;
use super::service::BalanceService;
use super::testing::InMemoryLedgerStore;
use super::types::{BalanceChange, TransferRequest};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// A credit (`true`) or debit (`false`) of some amount.
fn operation() -> impl Strategy<Value = (bool, Decimal)> {
    (any::<bool>(), positive_amount())
}

fn id(raw: i64) -> AccountId {
    AccountId::new(raw).unwrap()
}

fn change(account: i64, value: Decimal) -> BalanceChange {
    BalanceChange::new(id(account), Amount::new(value).unwrap(), Utc::now(), "prop")
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The stored balance always equals the exact running sum of accepted
    /// operations, and a rejected debit never changes it.
    #[test]
    fn prop_balance_tracks_exact_running_sum(
        seed in positive_amount(),
        ops in prop::collection::vec(operation(), 1..40),
    ) {
        block_on(async move {
            let store = Arc::new(InMemoryLedgerStore::default());
            let service = BalanceService::new(store.clone());
            service.add_income(change(1, seed)).await.unwrap();

            let mut expected = seed;
            let mut accepted = 1usize;
            for (is_credit, value) in ops {
                if is_credit {
                    service.add_income(change(1, value)).await.unwrap();
                    expected += value;
                    accepted += 1;
                } else if value <= expected {
                    service.add_expense(change(1, value)).await.unwrap();
                    expected -= value;
                    accepted += 1;
                } else {
                    let err = service.add_expense(change(1, value)).await.unwrap_err();
                    prop_assert_eq!(err, BalanceError::InsufficientBalance(id(1)));
                }

                let balance = service.get_balance(id(1)).await.unwrap();
                prop_assert_eq!(balance.value, expected);
                prop_assert!(balance.value >= Decimal::ZERO);
            }

            prop_assert_eq!(store.history().len(), accepted);
            Ok(())
        })?;
    }

    /// A transfer moves exactly its amount or nothing at all.
    #[test]
    fn prop_transfer_conserves_total(
        funded in positive_amount(),
        requested in positive_amount(),
        destination_exists in any::<bool>(),
    ) {
        block_on(async move {
            let store = Arc::new(InMemoryLedgerStore::default());
            let service = BalanceService::new(store.clone());
            service.add_income(change(1, funded)).await.unwrap();
            let destination_start = if destination_exists {
                service.add_income(change(2, Decimal::ONE)).await.unwrap();
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
            let history_before = store.history().len();

            let request = TransferRequest::new(
                id(1),
                id(2),
                Amount::new(requested).unwrap(),
                Utc::now(),
                "prop transfer",
            )
            .unwrap();
            let result = service.transfer(request).await;

            let source = service.get_balance(id(1)).await.unwrap().value;
            if requested <= funded {
                prop_assert!(result.is_ok());
                let destination = service.get_balance(id(2)).await.unwrap().value;
                prop_assert_eq!(source, funded - requested);
                prop_assert_eq!(destination, destination_start + requested);
                prop_assert_eq!(source + destination, funded + destination_start);

                let history = store.history();
                prop_assert_eq!(history.len(), history_before + 1);
                let last = history.last().unwrap();
                prop_assert_eq!((last.from_id, last.to_id, last.amount), (1, 2, requested));
            } else {
                prop_assert_eq!(result.unwrap_err(), BalanceError::InsufficientBalance(id(1)));
                prop_assert_eq!(source, funded);
                prop_assert_eq!(store.history().len(), history_before);
                if !destination_exists {
                    prop_assert_eq!(
                        service.get_balance(id(2)).await.unwrap_err(),
                        BalanceError::UnknownAccount(id(2))
                    );
                }
            }
            Ok(())
        })?;
    }
}
