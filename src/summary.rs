//! The aggregate summary over all stored transactions.
//!
//! Computes total income, total expenses, the resulting balance and
//! per-category totals in a single pass.

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    transaction::{Transaction, TransactionType, get_all_transactions},
};

/// The aggregate report over every stored transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of amounts over all income transactions.
    pub total_income: f64,
    /// The sum of amounts over all expense transactions.
    pub total_expenses: f64,
    /// Total income minus total expenses.
    pub balance: f64,
    /// The sum of amounts per category over all transactions.
    ///
    /// Income and expense amounts in the same category are added together,
    /// not netted against each other.
    pub by_category: BTreeMap<String, f64>,
}

/// Compute the summary in a single linear pass over `transactions`.
///
/// An empty slice yields all-zero totals and an empty category map. Amounts
/// accumulate as plain `f64` values with no rounding or currency-precision
/// correction.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    let mut by_category: BTreeMap<String, f64> = BTreeMap::new();

    for transaction in transactions {
        match transaction.kind {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => total_expenses += transaction.amount,
        }

        *by_category
            .entry(transaction.category.clone())
            .or_insert(0.0) += transaction.amount;
    }

    Summary {
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        by_category,
    }
}

/// The state needed to compute the summary.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for the aggregate summary of all transactions.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_summary_endpoint(
    State(state): State<SummaryState>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().unwrap();
    let transactions = get_all_transactions(&connection)?;

    Ok(Json(summarize(&transactions)))
}
