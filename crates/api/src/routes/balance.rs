//! Balance routes: income, expense, transfer and balance lookup.

use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::balance::{Balance, BalanceChange, TransferRequest};
use tally_shared::{AccountId, Amount, RequestError};

use crate::{AppState, error::ApiError};

/// Creates the balance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/income", post(add_income))
        .route("/expense", post(add_expense))
        .route("/transfer", post(transfer))
        .route("/balance", get(get_balance))
}

/// Request body for income and expense.
#[derive(Debug, Deserialize)]
pub struct BalanceChangeRequest {
    /// Account to credit or debit.
    pub user_id: i64,
    /// Amount, positive with at most two decimal places.
    pub value: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// When the movement happened (defaults to now).
    pub time: Option<DateTime<Utc>>,
}

impl BalanceChangeRequest {
    fn into_change(self) -> Result<BalanceChange, RequestError> {
        Ok(BalanceChange::new(
            AccountId::new(self.user_id)?,
            Amount::new(self.value)?,
            self.time.unwrap_or_else(Utc::now),
            self.description,
        ))
    }
}

/// Request body for a transfer.
#[derive(Debug, Deserialize)]
pub struct TransferBody {
    /// Debited account.
    pub from_id: i64,
    /// Credited account.
    pub to_id: i64,
    /// Amount, positive with at most two decimal places.
    pub amount: Decimal,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// When the transfer happened (defaults to now).
    pub time: Option<DateTime<Utc>>,
}

impl TransferBody {
    fn into_request(self) -> Result<TransferRequest, RequestError> {
        TransferRequest::new(
            AccountId::new(self.from_id)?,
            AccountId::new(self.to_id)?,
            Amount::new(self.amount)?,
            self.time.unwrap_or_else(Utc::now),
            self.description,
        )
    }
}

/// Query parameters for a balance lookup.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Account to read.
    pub user_id: String,
}

/// Body returned by successful mutations.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Always `"success"`.
    pub status: &'static str,
}

const SUCCESS: StatusResponse = StatusResponse { status: "success" };

/// POST `/balance/v1/income` - Credit an account, opening it if needed.
async fn add_income(
    State(state): State<AppState>,
    payload: Result<Json<BalanceChangeRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(payload) = payload?;
    let change = payload.into_change()?;

    state.balance.add_income(change).await?;
    Ok(Json(SUCCESS))
}

/// POST `/balance/v1/expense` - Debit an existing account.
async fn add_expense(
    State(state): State<AppState>,
    payload: Result<Json<BalanceChangeRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(payload) = payload?;
    let change = payload.into_change()?;

    state.balance.add_expense(change).await?;
    Ok(Json(SUCCESS))
}

/// POST `/balance/v1/transfer` - Move money between two accounts.
async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferBody>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
    let Json(payload) = payload?;
    let request = payload.into_request()?;

    state.balance.transfer(request).await?;
    Ok(Json(SUCCESS))
}

/// GET `/balance/v1/balance?user_id=N` - Read the current balance.
async fn get_balance(
    State(state): State<AppState>,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<Balance>, ApiError> {
    let Query(query) = query?;
    let account_id: AccountId = query.user_id.parse()?;

    let balance = state.balance.get_balance(account_id).await?;
    Ok(Json(balance))
}
