//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing,
//!   querying, updating and deleting records
//! - Validation of incoming create and update payloads
//! - The HTTP endpoints for the CRUD operations

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod update_endpoint;
mod validation;

pub use core::{
    NewTransaction, Transaction, TransactionChanges, TransactionType, create_transaction_table,
    get_all_transactions,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use update_endpoint::update_transaction_endpoint;
pub use validation::{EditTransactionForm, TransactionForm};

#[cfg(test)]
pub use core::{
    create_transaction, delete_transaction, get_transaction, get_transactions, update_transaction,
};
