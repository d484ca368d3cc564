use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{errors::BookingError, models::time_range::TimeRange};

/// How a booking affects declared ranges that overlap it without being equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Declared ranges are consumed only by a booking of exactly that range.
    #[default]
    Independent,
    /// A booking also consumes every declared range overlapping it.
    Exclusive,
}

impl OverlapPolicy {
    pub fn blocks(&self, declared: &TimeRange, booked: &TimeRange) -> bool {
        match self {
            OverlapPolicy::Independent => declared == booked,
            OverlapPolicy::Exclusive => declared.overlaps(booked),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(OverlapPolicy::Independent),
            "exclusive" => Ok(OverlapPolicy::Exclusive),
            other => Err(BookingError::Validation(format!(
                "unknown overlap policy '{other}', expected 'independent' or 'exclusive'"
            ))),
        }
    }
}

/// Declared ranges not consumed by any booked range, ascending.
pub fn free_ranges<'a>(
    declared: impl IntoIterator<Item = &'a TimeRange>,
    booked: &[TimeRange],
    policy: OverlapPolicy,
) -> Vec<TimeRange> {
    let mut free: Vec<TimeRange> = declared
        .into_iter()
        .filter(|range| !booked.iter().any(|taken| policy.blocks(range, taken)))
        .copied()
        .collect();
    free.sort();
    free.dedup();
    free
}

/// Declared ranges consumed by at least one booked range, ascending.
pub fn taken_ranges<'a>(
    declared: impl IntoIterator<Item = &'a TimeRange>,
    booked: &[TimeRange],
    policy: OverlapPolicy,
) -> Vec<TimeRange> {
    let mut taken: Vec<TimeRange> = declared
        .into_iter()
        .filter(|range| booked.iter().any(|taken| policy.blocks(range, taken)))
        .copied()
        .collect();
    taken.sort();
    taken.dedup();
    taken
}
