//! Balance and history tables.
//!
//! `balances` holds one row per account with its current value only;
//! `history` is append-only, one row per money movement.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(BALANCES_SQL).await?;
        db.execute_unprepared(HISTORY_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS history; DROP TABLE IF EXISTS balances;")
            .await?;
        Ok(())
    }
}

const BALANCES_SQL: &str = r"
CREATE TABLE balances (
    account_id BIGINT PRIMARY KEY,
    value NUMERIC(20, 2) NOT NULL,
    CONSTRAINT balances_account_id_positive CHECK (account_id > 0),
    CONSTRAINT balances_value_non_negative CHECK (value >= 0)
);
";

const HISTORY_SQL: &str = r"
-- from_id = 0 is external income, to_id = 0 is external expense
CREATE TABLE history (
    id BIGSERIAL PRIMARY KEY,
    from_id BIGINT NOT NULL DEFAULT 0,
    to_id BIGINT NOT NULL DEFAULT 0,
    amount NUMERIC(20, 2) NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    CONSTRAINT history_amount_positive CHECK (amount > 0),
    CONSTRAINT history_has_account CHECK (from_id <> 0 OR to_id <> 0),
    CONSTRAINT history_not_self CHECK (from_id <> to_id)
);

CREATE INDEX idx_history_from_id ON history (from_id) WHERE from_id <> 0;
CREATE INDEX idx_history_to_id ON history (to_id) WHERE to_id <> 0;
";
