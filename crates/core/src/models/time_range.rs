use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{BookingError, BookingResult};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Length given to a legacy single-time slot such as `09:00`.
pub const LEGACY_SLOT_MINUTES: u16 = 60;

/// A half-open `[start, end)` interval of minutes within one day.
///
/// The canonical text form is zero-padded `HH:MM-HH:MM`, so the derived
/// ordering on `(start, end)` agrees with lexical ordering of that text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeRange {
    start: u16,
    end: u16,
}

impl TimeRange {
    /// Normalizes `HH:MM-HH:MM` or legacy `HH:MM` text.
    ///
    /// A legacy single time becomes a one-hour range and is rejected when that
    /// hour would run past midnight. `24:00` is only accepted as an end time.
    pub fn parse(raw: &str) -> BookingResult<Self> {
        let text = raw.trim();
        let invalid = || BookingError::InvalidTimeFormat(format!("'{raw}' is not HH:MM or HH:MM-HH:MM"));

        match text.split_once('-') {
            Some((start, end)) => {
                let start = parse_clock(start.trim(), false).ok_or_else(invalid)?;
                let end = parse_clock(end.trim(), true).ok_or_else(invalid)?;
                if start >= end {
                    return Err(BookingError::InvalidTimeFormat(format!(
                        "'{raw}': end must be after start"
                    )));
                }
                Ok(Self { start, end })
            }
            None => {
                let start = parse_clock(text, false).ok_or_else(invalid)?;
                let end = start + LEGACY_SLOT_MINUTES;
                if end > MINUTES_PER_DAY {
                    return Err(BookingError::InvalidTimeFormat(format!(
                        "'{raw}': a one-hour slot would pass midnight"
                    )));
                }
                Ok(Self { start, end })
            }
        }
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn parse_clock(text: &str, allow_end_of_day: bool) -> Option<u16> {
    let (hours, minutes) = text.split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    if minutes > 59 {
        return None;
    }

    match hours {
        0..=23 => Some(hours * 60 + minutes),
        24 if allow_end_of_day && minutes == 0 => Some(MINUTES_PER_DAY),
        _ => None,
    }
}

/// Formats a minute-of-day as zero-padded `HH:MM`.
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", format_minutes(self.start), format_minutes(self.end))
    }
}

impl FromStr for TimeRange {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeRange {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeRange> for String {
    fn from(range: TimeRange) -> Self {
        range.to_string()
    }
}
