//! Validation of incoming transaction payloads.
//!
//! The raw payload types deserialize the `type` and `date` fields as plain
//! strings so that every violated constraint can be reported back to the
//! client in one response, instead of the deserializer rejecting the request
//! at the first bad field. Validation is pure and performs no I/O.

use serde::Deserialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
    Error,
    transaction::{NewTransaction, TransactionChanges, TransactionType},
};

/// The maximum number of characters allowed in a transaction description.
pub const DESCRIPTION_MAX_CHARS: usize = 255;

/// The maximum number of characters allowed in a category label.
pub const CATEGORY_MAX_CHARS: usize = 50;

/// The raw payload for creating a transaction.
///
/// All five fields are required. Use [TransactionForm::validate] to turn the
/// payload into a [NewTransaction] that is safe to persist.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction.
    pub amount: f64,
    /// The raw transaction type, expected to be "income" or "expense".
    #[serde(rename = "type")]
    pub kind: String,
    /// The label grouping this transaction for aggregation.
    pub category: String,
    /// The raw transaction date, expected to be an RFC 3339 timestamp.
    pub date: String,
}

impl TransactionForm {
    /// Validate every field of the payload.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every violated constraint.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let mut violations = Vec::new();

        check_description(&self.description, &mut violations);
        check_amount(self.amount, &mut violations);
        let kind = check_kind(&self.kind, &mut violations);
        check_category(&self.category, &mut violations);
        let date = check_date(&self.date, &mut violations);

        match (kind, date) {
            (Some(kind), Some(date)) if violations.is_empty() => Ok(NewTransaction {
                description: self.description,
                amount: self.amount,
                kind,
                category: self.category,
                date,
            }),
            _ => Err(Error::Validation(violations)),
        }
    }
}

/// The raw payload for a partial update.
///
/// Every field is optional: a field absent from the request body is left
/// untouched on the stored record, which is not the same as a field set to an
/// empty or zero value. Present fields are validated with the same rules as
/// [TransactionForm].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditTransactionForm {
    /// New text detailing the transaction, if given.
    #[serde(default)]
    pub description: Option<String>,
    /// A new value for the transaction, if given.
    #[serde(default)]
    pub amount: Option<f64>,
    /// A new raw transaction type, if given.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// A new category label, if given.
    #[serde(default)]
    pub category: Option<String>,
    /// A new raw transaction date, if given.
    #[serde(default)]
    pub date: Option<String>,
}

impl EditTransactionForm {
    /// Validate each field that is present in the payload.
    ///
    /// # Errors
    /// Returns an [Error::Validation] listing every violated constraint.
    pub fn validate(self) -> Result<TransactionChanges, Error> {
        let mut violations = Vec::new();

        if let Some(ref description) = self.description {
            check_description(description, &mut violations);
        }
        if let Some(amount) = self.amount {
            check_amount(amount, &mut violations);
        }
        let kind = match self.kind {
            Some(ref raw_kind) => check_kind(raw_kind, &mut violations),
            None => None,
        };
        if let Some(ref category) = self.category {
            check_category(category, &mut violations);
        }
        let date = match self.date {
            Some(ref raw_date) => check_date(raw_date, &mut violations),
            None => None,
        };

        if violations.is_empty() {
            Ok(TransactionChanges {
                description: self.description,
                amount: self.amount,
                kind,
                category: self.category,
                date,
            })
        } else {
            Err(Error::Validation(violations))
        }
    }
}

fn check_description(description: &str, violations: &mut Vec<String>) {
    let char_count = description.chars().count();

    if char_count == 0 {
        violations.push("description must not be empty".to_owned());
    } else if char_count > DESCRIPTION_MAX_CHARS {
        violations.push(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters, got {char_count}"
        ));
    }
}

fn check_amount(amount: f64, violations: &mut Vec<String>) {
    // NaN must fail this check too, so the comparison is written negated.
    if !(amount > 0.0) {
        violations.push(format!("amount must be greater than zero, got {amount}"));
    }
}

fn check_kind(raw_kind: &str, violations: &mut Vec<String>) -> Option<TransactionType> {
    let kind = TransactionType::from_str_exact(raw_kind);

    if kind.is_none() {
        violations.push(format!(
            "type must be either 'income' or 'expense', got '{raw_kind}'"
        ));
    }

    kind
}

fn check_category(category: &str, violations: &mut Vec<String>) {
    let char_count = category.chars().count();

    if char_count == 0 {
        violations.push("category must not be empty".to_owned());
    } else if char_count > CATEGORY_MAX_CHARS {
        violations.push(format!(
            "category must be at most {CATEGORY_MAX_CHARS} characters, got {char_count}"
        ));
    }
}

fn check_date(raw_date: &str, violations: &mut Vec<String>) -> Option<OffsetDateTime> {
    match OffsetDateTime::parse(raw_date, &Rfc3339) {
        Ok(date) => Some(date),
        Err(_) => {
            violations.push(format!(
                "date must be an RFC 3339 timestamp, got '{raw_date}'"
            ));
            None
        }
    }
}
