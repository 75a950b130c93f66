//! Lenient coercion of loosely-typed external values
//!
//! Records arrive from form input and a hosted database where numbers may be
//! strings, nulls or missing. These helpers turn such values into zero or
//! `None` instead of failing.

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::de::{self, Deserializer, Visitor};

use crate::utils::dates::normalize_date;

/// Parse a raw amount, treating anything non-numeric as zero
pub fn coerce_amount(raw: &str) -> BigDecimal {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return BigDecimal::from(0);
    }
    BigDecimal::from_str(trimmed).unwrap_or_else(|_| BigDecimal::from(0))
}

fn amount_from_f64(value: f64) -> BigDecimal {
    if !value.is_finite() {
        return BigDecimal::from(0);
    }
    // Display gives the shortest round-trip form, never exponent notation
    coerce_amount(&value.to_string())
}

struct LenientAmountVisitor;

impl<'de> Visitor<'de> for LenientAmountVisitor {
    type Value = BigDecimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number, a numeric string or null")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(amount_from_f64(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(coerce_amount(value))
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(0))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(0))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(BigDecimal::from(0))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientAmountVisitor)
    }
}

/// `deserialize_with` helper for money fields
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientAmountVisitor)
}

struct LenientDateVisitor;

impl<'de> Visitor<'de> for LenientDateVisitor {
    type Value = Option<NaiveDate>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a DD/MM/YYYY or ISO date string, or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(normalize_date(value))
    }

    fn visit_i64<E: de::Error>(self, _value: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _value: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientDateVisitor)
    }
}

/// `deserialize_with` helper for user-entered date fields
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientDateVisitor)
}
