//! Date parsing and formatting helpers.

use arrow::datatypes::Date32Type;
use chrono::NaiveDate;

use crate::config::DateFormatConfig;
use crate::error::{CohortError, Result};

/// Fixed year length used for all interval conversions
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Parse a date string with multiple format attempts
#[must_use]
pub fn parse_date_string(s: &str, config: &DateFormatConfig) -> Option<NaiveDate> {
    let s = s.trim();

    for format in &config.date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if config.enable_format_detection {
        if let Some(detected_format) = detect_date_format(s) {
            if let Ok(date) = NaiveDate::parse_from_str(s, detected_format) {
                return Some(date);
            }
        }
    }

    None
}

/// Parse a date string, failing with a `MalformedDate` error naming the value
pub fn parse_date_strict(s: &str, config: &DateFormatConfig) -> Result<NaiveDate> {
    parse_date_string(s, config).ok_or_else(|| CohortError::malformed_date(s))
}

/// Try to detect the date format based on string patterns
#[must_use]
pub fn detect_date_format(s: &str) -> Option<&'static str> {
    // YYYY-MM-DD, possibly followed by a time component
    if s.len() >= 10 && s.as_bytes().get(4) == Some(&b'-') && s.as_bytes().get(7) == Some(&b'-') {
        return if s.len() == 10 {
            Some("%Y-%m-%d")
        } else if s.contains('T') {
            Some("%Y-%m-%dT%H:%M:%S")
        } else {
            Some("%Y-%m-%d %H:%M:%S")
        };
    }

    if s.contains('/') {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() == 3 {
            if parts[0].len() == 4 {
                return Some("%Y/%m/%d");
            } else if parts[2].len() == 4 {
                // Only reached after the configured formats fail; detection reads day first
                return Some("%d/%m/%Y");
            }
        }
    }

    if s.contains('.') {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() == 3 && parts[2].len() == 4 {
            return Some("%d.%m.%Y");
        }
    }

    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        return Some("%Y%m%d");
    }

    None
}

/// Render a date in compact `YYYYMMDD` form
#[must_use]
pub fn format_compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Whole days from `start` to `end` (negative when `end` precedes `start`)
#[must_use]
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Length of the span from `start` to `end` in fixed 365-day years
#[must_use]
pub fn years_between(start: NaiveDate, end: NaiveDate) -> f64 {
    days_between(start, end) as f64 / DAYS_PER_YEAR
}

/// Convert a date to Arrow's Date32 representation (days since the epoch)
#[must_use]
pub fn to_date32(date: NaiveDate) -> i32 {
    Date32Type::from_naive_date(date)
}

/// Round a value to the given number of decimal places
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
