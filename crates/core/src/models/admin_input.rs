//! Parsing of the short date/time notation administrators type on a phone.
//!
//! Accepted forms, where the time part is either `HH:MM HH:MM`, a single
//! `HH:MM` (one-hour slot) or `HH:MM-HH:MM`:
//!
//! - `DD.MM <time>` (current year)
//! - `DD.MM.YYYY <time>`
//! - `YYYY-MM-DD <time>`
//!
//! Dotted dates may also use `-` as the separator.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{BookingError, BookingResult},
    models::{calendar::parse_date, time_range::TimeRange},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotInput {
    pub date: String,
    pub range: TimeRange,
}

pub fn parse_slot_input(text: &str, today: NaiveDate) -> BookingResult<SlotInput> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let (date_part, time_text) = match parts.as_slice() {
        [date, start] => (*date, start.to_string()),
        [date, start, end, ..] => (*date, format!("{start}-{end}")),
        _ => {
            return Err(BookingError::Validation(format!(
                "'{text}' should look like 'DD.MM HH:MM HH:MM'"
            )));
        }
    };

    let date = parse_date_part(date_part, today.year())?;
    let range = TimeRange::parse(&time_text)?;
    Ok(SlotInput { date, range })
}

fn parse_date_part(text: &str, current_year: i32) -> BookingResult<String> {
    let invalid = || BookingError::Validation(format!("'{text}' is not a recognised date"));

    let iso = if is_digits(text, &[4, 2, 2], '-') {
        text.to_string()
    } else {
        let separator = text.chars().nth(2).unwrap_or('.');
        if separator != '.' && separator != '-' {
            return Err(invalid());
        }

        let fields: Vec<&str> = text.split(separator).collect();
        match fields.as_slice() {
            [day, month, year] if is_digits(text, &[2, 2, 4], separator) => {
                format!("{year}-{month}-{day}")
            }
            [day, month] if is_digits(text, &[2, 2], separator) => {
                format!("{current_year:04}-{month}-{day}")
            }
            _ => return Err(invalid()),
        }
    };

    parse_date(&iso).map_err(|_| invalid())?;
    Ok(iso)
}

fn is_digits(text: &str, widths: &[usize], separator: char) -> bool {
    let fields: Vec<&str> = text.split(separator).collect();
    fields.len() == widths.len()
        && fields
            .iter()
            .zip(widths)
            .all(|(field, width)| field.len() == *width && field.bytes().all(|b| b.is_ascii_digit()))
}
