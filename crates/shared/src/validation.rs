//! Common validation utilities for booking payloads.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Wall-clock time in 24h HH:MM form. No seconds, no timezone.
    static ref TIME_OF_DAY: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();

    /// Phone numbers: digits with optional leading +, spaces and dashes allowed.
    static ref PHONE: Regex = Regex::new(r"^\+?[\d\s\-]{6,20}$").unwrap();
}

/// Validates a wall-clock time string (HH:MM, 24-hour).
pub fn validate_time_of_day(time: &str) -> Result<(), ValidationError> {
    if TIME_OF_DAY.is_match(time) {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_of_day");
        err.message = Some("Time must be in HH:MM 24-hour format".into());
        Err(err)
    }
}

/// Validates an ISO 8601 calendar date string (YYYY-MM-DD).
pub fn validate_iso_date(date: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("iso_date");
        err.message = Some("Date must be an ISO 8601 date (YYYY-MM-DD)".into());
        Err(err)
    }
}

/// Validates a client phone number.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Phone must be 6-20 digits, with optional +, spaces, or dashes".into());
        Err(err)
    }
}

/// Validates that a price is non-negative and finite.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("price_range");
        err.message = Some("Price must be non-negative".into());
        Err(err)
    }
}
