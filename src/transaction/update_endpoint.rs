//! Defines the endpoint for partially updating an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::TransactionId,
    transaction::{EditTransactionForm, core::update_transaction},
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating a transaction.
///
/// Fields absent from the payload keep their stored values. Responds with the
/// updated record, 404 if no transaction has the requested ID, or 422 listing
/// every violated constraint.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_transaction_endpoint(
    State(state): State<UpdateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(form): Json<EditTransactionForm>,
) -> Result<impl IntoResponse, Error> {
    let changes = form.validate()?;

    let connection = state.db_connection.lock().unwrap();
    let transaction = update_transaction(transaction_id, changes, &connection)?;

    Ok(Json(transaction))
}
