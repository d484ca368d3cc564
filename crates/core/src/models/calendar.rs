use chrono::NaiveDate;

use crate::errors::{BookingError, BookingResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date in its canonical `YYYY-MM-DD` form.
///
/// Only the exact zero-padded form is accepted, since dates are used as
/// storage keys and compared as text.
pub fn parse_date(text: &str) -> BookingResult<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == text)
        .ok_or_else(|| BookingError::Validation(format!("'{text}' is not a YYYY-MM-DD date")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
