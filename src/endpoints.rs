//! The API endpoint URIs.

/// The root route, which reports the service name.
pub const ROOT: &str = "/";
/// The route to create a transaction or list transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to get, update or delete a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for the aggregate summary of all transactions.
pub const SUMMARY: &str = "/summary";
