//! Reject NaN in money columns.
//!
//! PostgreSQL orders NUMERIC 'NaN' above every number, so `value >= 0` and
//! `amount > 0` both accept it. The constraints keep their names.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(DOWN_SQL).await?;
        Ok(())
    }
}

const UP_SQL: &str = r"
ALTER TABLE balances
    DROP CONSTRAINT balances_value_non_negative,
    ADD CONSTRAINT balances_value_non_negative CHECK (value >= 0 AND value <> 'NaN');

ALTER TABLE history
    DROP CONSTRAINT history_amount_positive,
    ADD CONSTRAINT history_amount_positive CHECK (amount > 0 AND amount <> 'NaN');
";

const DOWN_SQL: &str = r"
ALTER TABLE balances
    DROP CONSTRAINT balances_value_non_negative,
    ADD CONSTRAINT balances_value_non_negative CHECK (value >= 0);

ALTER TABLE history
    DROP CONSTRAINT history_amount_positive,
    ADD CONSTRAINT history_amount_positive CHECK (amount > 0);
";
