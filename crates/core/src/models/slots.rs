use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::models::time_range::TimeRange;

/// Declared bookable ranges keyed by `YYYY-MM-DD` date.
///
/// Dates with no ranges are never stored: every mutation that empties a
/// date removes its key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvailableSlots(BTreeMap<String, BTreeSet<TimeRange>>);

impl AvailableSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ranges(&self, date: &str) -> Option<&BTreeSet<TimeRange>> {
        self.0.get(date)
    }

    /// Replaces the ranges of `date`.
    pub fn set(&mut self, date: &str, ranges: impl IntoIterator<Item = TimeRange>) {
        let ranges: BTreeSet<TimeRange> = ranges.into_iter().collect();
        if ranges.is_empty() {
            self.0.remove(date);
        } else {
            self.0.insert(date.to_string(), ranges);
        }
    }

    /// Unions `ranges` into `date`, returning how many were new.
    pub fn add(&mut self, date: &str, ranges: impl IntoIterator<Item = TimeRange>) -> usize {
        let mut ranges = ranges.into_iter().peekable();
        if ranges.peek().is_none() {
            return 0;
        }

        let existing = self.0.entry(date.to_string()).or_default();
        ranges.filter(|range| existing.insert(*range)).count()
    }

    /// Removes ranges whose canonical text equals one of `ranges`.
    pub fn remove_exact<S: AsRef<str>>(&mut self, date: &str, ranges: &[S]) -> usize {
        let Some(existing) = self.0.get_mut(date) else {
            return 0;
        };

        let before = existing.len();
        existing.retain(|range| {
            let text = range.to_string();
            !ranges.iter().any(|raw| raw.as_ref() == text)
        });
        let removed = before - existing.len();

        if existing.is_empty() {
            self.0.remove(date);
        }
        removed
    }

    pub fn remove(&mut self, date: &str, range: &TimeRange) -> bool {
        let Some(existing) = self.0.get_mut(date) else {
            return false;
        };

        let removed = existing.remove(range);
        if existing.is_empty() {
            self.0.remove(date);
        }
        removed
    }

    pub fn clear(&mut self, date: &str) -> bool {
        self.0.remove(date).is_some()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<TimeRange>)> {
        self.0.iter().map(|(date, ranges)| (date.as_str(), ranges))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for AvailableSlots {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut slots = BTreeMap::<String, BTreeSet<TimeRange>>::deserialize(deserializer)?;
        slots.retain(|_, ranges| !ranges.is_empty());
        Ok(Self(slots))
    }
}

impl FromIterator<(String, TimeRange)> for AvailableSlots {
    fn from_iter<I: IntoIterator<Item = (String, TimeRange)>>(iter: I) -> Self {
        let mut slots = AvailableSlots::new();
        for (date, range) in iter {
            slots.add(&date, [range]);
        }
        slots
    }
}
