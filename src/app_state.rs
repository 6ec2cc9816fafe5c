//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, pagination::PaginationConfig};

/// The state of the REST server.
///
/// Every route handler receives the parts of this state it needs through a
/// [FromRef][axum::extract::FromRef] state struct; there is no ambient global
/// store handle.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The config that controls paging defaults and bounds.
    pub pagination_config: PaginationConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            pagination_config,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
