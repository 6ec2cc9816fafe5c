//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{TransactionForm, core::create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the full record (including the assigned ID and
/// creation timestamp) on success, or 422 listing every violated constraint.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(form): Json<TransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let new_transaction = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = create_transaction(new_transaction, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
