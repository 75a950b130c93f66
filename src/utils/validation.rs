//! Validation utilities for boundary adapters
//!
//! None of the calculators call these; they exist for callers that want to
//! reject bad form input before it reaches the lenient computations.

use std::sync::LazyLock;

use bigdecimal::BigDecimal;
use regex::Regex;

use crate::types::*;

static IC_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}-\d{2}-\d{4}$").expect("valid IC number pattern"));

static TAX_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid tax id pattern"));

/// Largest amount accepted from a form field
pub fn max_currency_amount() -> BigDecimal {
    BigDecimal::new(99_999_999_999_i64.into(), 2)
}

/// Validate a currency amount entered by a user
pub fn validate_currency_amount(amount: &BigDecimal) -> TaxResult<()> {
    if *amount <= BigDecimal::from(0) {
        return Err(TaxError::Validation("Amount must be positive".to_string()));
    }

    if *amount > max_currency_amount() {
        return Err(TaxError::Validation("Amount is too large".to_string()));
    }

    Ok(())
}

/// Validate a Malaysian identity card number (e.g. `900101-01-1234`)
pub fn validate_ic_number(ic_number: &str) -> TaxResult<()> {
    if !IC_NUMBER.is_match(ic_number.trim()) {
        return Err(TaxError::Validation(format!(
            "Invalid IC number '{}', expected the form 900101-01-1234",
            ic_number
        )));
    }
    Ok(())
}

/// Validate a business tax identification number (12 digits)
pub fn validate_tax_id(tax_id: &str) -> TaxResult<()> {
    if !TAX_ID.is_match(tax_id.trim()) {
        return Err(TaxError::Validation(
            "Tax ID must be 12 digits".to_string(),
        ));
    }
    Ok(())
}

/// Validate a tax year
pub fn validate_tax_year(tax_year: i32) -> TaxResult<()> {
    if !(2000..=2100).contains(&tax_year) {
        return Err(TaxError::Validation(format!(
            "Tax year {} is out of range",
            tax_year
        )));
    }
    Ok(())
}
