//! This module defines the common functionality for paging data.

use serde::Deserialize;

use crate::Error;

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The number of records to return when a request does not specify a limit.
    pub default_limit: i64,
    /// The largest number of records a single request may ask for.
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// The query parameters for listing transactions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// The number of records to skip from the start of the list.
    ///
    /// Signed so that a negative value reaches [ListQuery::resolve] and is
    /// reported as a validation error rather than a deserialization failure.
    #[serde(default)]
    pub skip: i64,
    /// The maximum number of records to return.
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Resolve the query against `config`, filling in the default limit and
    /// rejecting out-of-range values.
    ///
    /// Returns the `(skip, limit)` pair to page with.
    ///
    /// # Errors
    /// Returns an [Error::Validation] if the requested skip is negative, or
    /// if the requested limit is zero or larger than the configured maximum.
    pub fn resolve(self, config: &PaginationConfig) -> Result<(i64, i64), Error> {
        let mut violations = Vec::new();

        if self.skip < 0 {
            violations.push(format!("skip must be at least zero, got {}", self.skip));
        }

        let limit = self.limit.unwrap_or(config.default_limit);

        if limit < 1 || limit > config.max_limit {
            violations.push(format!(
                "limit must be between 1 and {}, got {limit}",
                config.max_limit
            ));
        }

        if violations.is_empty() {
            Ok((self.skip, limit))
        } else {
            Err(Error::Validation(violations))
        }
    }
}
