//! Shared setup for database integration tests.
//!
//! Tests need a running PostgreSQL instance. The URL is read from
//! `DATABASE_URL` (or `TALLY__DATABASE__URL`); when neither is set the test
//! prints a notice and returns early.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tally_core::balance::{BalanceChange, BalanceService, LedgerStore};
use tally_db::{connect, migrate, LedgerRepository};
use tally_shared::{AccountId, Amount, DatabaseConfig};
use tokio::sync::OnceCell;

/// Tests in one binary run in parallel; only the first applies migrations.
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Returns the configured database URL, if any.
pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("TALLY__DATABASE__URL"))
        .ok()
}

/// Connects and applies migrations, or returns `None` to skip the test.
pub async fn setup() -> Option<DatabaseConnection> {
    let Some(url) = database_url() else {
        eprintln!("Skipping test - DATABASE_URL not set");
        return None;
    };

    let mut config = DatabaseConfig::new(url);
    config.max_connections = 20;

    let db = match connect(&config).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping test - database not available: {e}");
            return None;
        }
    };

    MIGRATED
        .get_or_init(|| async {
            migrate(&db).await.expect("migrations should apply");
        })
        .await;
    Some(db)
}

/// Builds a repository and a service sharing it.
pub fn service(db: &DatabaseConnection) -> (Arc<LedgerRepository>, BalanceService) {
    let repo = Arc::new(LedgerRepository::new(db.clone()));
    let store: Arc<dyn LedgerStore> = repo.clone();
    (repo, BalanceService::new(store))
}

/// A fresh account id unlikely to collide with rows left by earlier runs.
pub fn fresh_account() -> AccountId {
    let raw = rand::rng().random_range(1_000_000..i64::MAX / 2);
    AccountId::new(raw).expect("random id is positive")
}

/// Two distinct fresh accounts.
pub fn fresh_pair() -> (AccountId, AccountId) {
    let a = fresh_account();
    let mut b = fresh_account();
    while b == a {
        b = fresh_account();
    }
    (a, b)
}

pub fn amount(value: Decimal) -> Amount {
    Amount::new(value).expect("test amount is valid")
}

pub fn change(account: AccountId, value: Decimal, description: &str) -> BalanceChange {
    BalanceChange::new(account, amount(value), Utc::now(), description)
}
