//! Database initialization for the application.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, transaction::create_transaction_table};

/// Create the application's tables in the database if they do not exist.
///
/// # Errors
/// Returns an error if the schema cannot be created or if there is an SQL
/// error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&sql_transaction)?;

    sql_transaction.commit()?;

    Ok(())
}
