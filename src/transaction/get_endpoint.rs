//! Defines the endpoint for fetching a single transaction by its ID.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId, transaction::core::get_transaction,
};

/// The state needed to fetch a transaction.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching a transaction by its ID.
///
/// Responds with 404 if no transaction has the requested ID.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().unwrap();
    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(Json(transaction))
}
