//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Income, expense, transfer and balance routes under `/balance/v1`
//! - The health check
//! - The JSON error response shape

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tally_core::balance::BalanceService;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Balance service backed by the configured ledger store.
    pub balance: Arc<BalanceService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    #[must_use]
    pub fn new(balance: BalanceService) -> Self {
        Self {
            balance: Arc::new(balance),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
