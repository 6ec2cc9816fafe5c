//! Defines the endpoint for listing transactions with pagination.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    pagination::{ListQuery, PaginationConfig},
    transaction::core::get_transactions,
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls paging defaults and bounds.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for listing transactions in insertion order.
///
/// Accepts `skip` (default 0) and `limit` (default 100, at most 1000) query
/// parameters; a negative skip or an out-of-range limit is rejected with 422.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, Error> {
    let (skip, limit) = query.resolve(&state.pagination_config)?;

    let connection = state.db_connection.lock().unwrap();
    let transactions = get_transactions(skip, limit, &connection)?;

    Ok(Json(transactions))
}
