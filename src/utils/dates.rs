//! Date normalization for user-entered and stored dates

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Normalize a raw date string into a calendar date
///
/// Accepted forms, in order: `DD/MM/YYYY` (how users type invoice and
/// deduction dates), ISO `YYYY-MM-DD` (how the database stores them), and ISO
/// date-times with or without an offset. The time of day is dropped.
/// The year must be written with four digits. Returns `None` for anything
/// else, including impossible calendar dates.
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains('/') {
        let year = raw.rsplit('/').next().unwrap_or_default();
        if !is_four_digit_year(year) {
            return None;
        }
        return NaiveDate::parse_from_str(raw, "%d/%m/%Y").ok();
    }

    if !is_four_digit_year(raw.split('-').next().unwrap_or_default()) {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(date_time) = DateTime::parse_from_rfc3339(raw) {
        return Some(date_time.date_naive());
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|date_time| date_time.date())
}

fn is_four_digit_year(year: &str) -> bool {
    year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit())
}
