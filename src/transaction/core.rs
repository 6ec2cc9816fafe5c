//! Defines the core data model and database queries for transactions.

use rusqlite::{
    Connection, Row, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brings money in or takes money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. wages or interest.
    Income,
    /// Money spent, e.g. groceries or rent.
    Expense,
}

impl TransactionType {
    /// The wire and storage representation of the transaction type.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse a transaction type from its wire representation.
    ///
    /// Matching is exact and case-sensitive: only `"income"` and `"expense"`
    /// are accepted.
    pub fn from_str_exact(value: &str) -> Option<Self> {
        match value {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        TransactionType::from_str_exact(text).ok_or_else(|| {
            FromSqlError::Other(format!("unknown transaction type: {text}").into())
        })
    }
}

/// An income or expense record, i.e. an event where money was either earned
/// or spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database on creation.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money earned or spent. Always greater than zero, the
    /// direction is carried by `kind`.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// A free-form label grouping transactions for aggregation.
    pub category: String,
    /// When the transaction happened, supplied by the caller.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the record was inserted, assigned by the database. Never updated.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A validated payload for creating a transaction.
///
/// Instances should be obtained through
/// [TransactionForm::validate][crate::transaction::TransactionForm::validate]
/// so that the field constraints hold before the record reaches storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money earned or spent.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionType,
    /// A free-form label grouping transactions for aggregation.
    pub category: String,
    /// When the transaction happened.
    pub date: OffsetDateTime,
}

/// A validated set of changes for a partial update.
///
/// `None` means "leave the field untouched", so callers can change any subset
/// of the mutable fields. The ID and creation timestamp can never be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// A new description, if the field should change.
    pub description: Option<String>,
    /// A new amount, if the field should change.
    pub amount: Option<f64>,
    /// A new transaction type, if the field should change.
    pub kind: Option<TransactionType>,
    /// A new category, if the field should change.
    pub category: Option<String>,
    /// A new transaction date, if the field should change.
    pub date: Option<OffsetDateTime>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a validated payload.
///
/// The database assigns the ID and the creation timestamp.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_at = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, type, category, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount, type, category, date, created_at",
        )?
        .query_row(
            params![
                new_transaction.description,
                new_transaction.amount,
                new_transaction.kind,
                new_transaction.category,
                new_transaction.date,
                created_at,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, description, amount, type, category, date, created_at \
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve a page of transactions, skipping the first `skip` records and
/// returning at most `limit` records.
///
/// Records are returned in insertion (ID) order so that paging is
/// deterministic.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    skip: i64,
    limit: i64,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, type, category, date, created_at \
             FROM \"transaction\" ORDER BY id ASC LIMIT ?1 OFFSET ?2",
        )?
        .query_map(params![limit, skip], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Retrieve every transaction in the database, in insertion (ID) order.
///
/// Used by the summary aggregation, which needs an unbounded read.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, type, category, date, created_at \
             FROM \"transaction\" ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::SqlError))
        .collect()
}

/// Apply a validated set of changes to the transaction with `id`.
///
/// Fields that are `None` in `changes` keep their prior values. Returns the
/// updated record.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let mut transaction = get_transaction(id, connection)?;

    if let Some(description) = changes.description {
        transaction.description = description;
    }
    if let Some(amount) = changes.amount {
        transaction.amount = amount;
    }
    if let Some(kind) = changes.kind {
        transaction.kind = kind;
    }
    if let Some(category) = changes.category {
        transaction.category = category;
    }
    if let Some(date) = changes.date {
        transaction.date = date;
    }

    connection.execute(
        "UPDATE \"transaction\" \
         SET description = ?1, amount = ?2, type = ?3, category = ?4, date = ?5 \
         WHERE id = ?6",
        params![
            transaction.description,
            transaction.amount,
            transaction.kind,
            transaction.category,
            transaction.date,
            id,
        ],
    )?;

    Ok(transaction)
}

/// Delete the transaction with `id` from the database permanently.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = :id",
        &[(":id", &id)],
    )?;

    if rows_affected == 0 {
        Err(Error::NotFound)
    } else {
        Ok(())
    }
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let kind = row.get(3)?;
    let category = row.get(4)?;
    let date = row.get(5)?;
    let created_at = row.get(6)?;

    Ok(Transaction {
        id,
        description,
        amount,
        kind,
        category,
        date,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            NewTransaction, TransactionChanges, TransactionType, create_transaction,
            delete_transaction, get_all_transactions, get_transaction, get_transactions,
            update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn new_test_transaction(description: &str, amount: f64) -> NewTransaction {
        NewTransaction {
            description: description.to_owned(),
            amount,
            kind: TransactionType::Expense,
            category: "food".to_owned(),
            date: datetime!(2024-01-15 12:00 UTC),
        }
    }

    #[test]
    fn create_assigns_id_and_created_at() {
        let conn = get_test_connection();

        let transaction = create_transaction(new_test_transaction("Groceries", 100.0), &conn)
            .expect("could not create transaction");

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.description, "Groceries");
        assert_eq!(transaction.amount, 100.0);
        assert_eq!(transaction.kind, TransactionType::Expense);
        assert_eq!(transaction.category, "food");
        assert_eq!(transaction.date, datetime!(2024-01-15 12:00 UTC));
    }

    #[test]
    fn create_then_get_round_trips() {
        let conn = get_test_connection();
        let created = create_transaction(new_test_transaction("Dinner", 30.0), &conn)
            .expect("could not create transaction");

        let fetched = get_transaction(created.id, &conn).expect("could not get transaction");

        assert_eq!(created, fetched);
    }

    #[test]
    fn get_fails_on_empty_store() {
        let conn = get_test_connection();

        let result = get_transaction(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn list_returns_all_records_up_to_limit() {
        let conn = get_test_connection();
        let record_count = 7;
        for i in 1..=record_count {
            create_transaction(new_test_transaction(&format!("transaction #{i}"), i as f64), &conn)
                .expect("could not create transaction");
        }

        let transactions = get_transactions(0, 100, &conn).expect("could not list transactions");

        assert_eq!(transactions.len(), record_count);
    }

    #[test]
    fn list_skips_and_limits_in_insertion_order() {
        let conn = get_test_connection();
        for i in 1..=10 {
            create_transaction(new_test_transaction(&format!("transaction #{i}"), i as f64), &conn)
                .expect("could not create transaction");
        }

        let transactions = get_transactions(3, 4, &conn).expect("could not list transactions");

        let ids: Vec<i64> = transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 5, 6, 7]);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = get_test_connection();
        let created = create_transaction(new_test_transaction("Dinner", 30.0), &conn)
            .expect("could not create transaction");

        let updated = update_transaction(
            created.id,
            TransactionChanges {
                amount: Some(35.5),
                ..Default::default()
            },
            &conn,
        )
        .expect("could not update transaction");

        assert_eq!(updated.amount, 35.5);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.kind, created.kind);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.created_at, created.created_at);

        let fetched = get_transaction(created.id, &conn).expect("could not get transaction");
        assert_eq!(updated, fetched);
    }

    #[test]
    fn update_applies_every_given_field() {
        let conn = get_test_connection();
        let created = create_transaction(new_test_transaction("Dinner", 30.0), &conn)
            .expect("could not create transaction");

        let updated = update_transaction(
            created.id,
            TransactionChanges {
                description: Some("Salary".to_owned()),
                amount: Some(5000.0),
                kind: Some(TransactionType::Income),
                category: Some("salary".to_owned()),
                date: Some(datetime!(2024-02-01 09:00 UTC)),
            },
            &conn,
        )
        .expect("could not update transaction");

        assert_eq!(updated.description, "Salary");
        assert_eq!(updated.amount, 5000.0);
        assert_eq!(updated.kind, TransactionType::Income);
        assert_eq!(updated.category, "salary");
        assert_eq!(updated.date, datetime!(2024-02-01 09:00 UTC));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[test]
    fn update_fails_on_missing_id() {
        let conn = get_test_connection();

        let result = update_transaction(42, TransactionChanges::default(), &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_then_get_fails_with_not_found() {
        let conn = get_test_connection();
        let created = create_transaction(new_test_transaction("Dinner", 30.0), &conn)
            .expect("could not create transaction");

        delete_transaction(created.id, &conn).expect("could not delete transaction");

        assert_eq!(get_transaction(created.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_missing_id() {
        let conn = get_test_connection();

        let result = delete_transaction(42, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn get_all_returns_every_record() {
        let conn = get_test_connection();
        for i in 1..=3 {
            create_transaction(new_test_transaction(&format!("transaction #{i}"), i as f64), &conn)
                .expect("could not create transaction");
        }

        let transactions = get_all_transactions(&conn).expect("could not get all transactions");

        assert_eq!(transactions.len(), 3);
    }
}
