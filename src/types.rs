//! Core record types and errors for the tax computation library

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::coerce::{lenient_amount, lenient_date};

/// Invoice as consumed by SST aggregation and dashboard metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Identifier from the persistence layer
    #[serde(default)]
    pub id: String,
    /// Client the invoice was issued to
    #[serde(default)]
    pub client_name: Option<String>,
    /// Gross amount in Ringgit
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: BigDecimal,
    /// Normalized invoice date; `None` when missing or unparseable
    #[serde(default, deserialize_with = "lenient_date")]
    pub invoice_date: Option<NaiveDate>,
}

impl Invoice {
    /// Create an invoice from a raw, user-entered date string
    ///
    /// Accepts `DD/MM/YYYY` and ISO forms; anything else leaves the date empty.
    pub fn new(id: String, amount: BigDecimal, invoice_date: &str) -> Self {
        Self {
            id,
            client_name: None,
            amount,
            invoice_date: crate::utils::normalize_date(invoice_date),
        }
    }

    /// Set the client name
    pub fn with_client(mut self, client_name: String) -> Self {
        self.client_name = Some(client_name);
        self
    }

    /// Whether the invoice date falls within `[start, end]`, inclusive
    pub fn is_dated_within(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.invoice_date
            .is_some_and(|date| date >= start && date <= end)
    }
}

/// Errors raised by constructors, validation and configuration
///
/// The computations themselves never fail; they default bad input instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaxError {
    #[error("Invalid filing period: {0}")]
    InvalidPeriod(String),
    #[error("Invalid category: {0}")]
    InvalidCategory(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Result type for fallible tax operations
pub type TaxResult<T> = Result<T, TaxError>;
