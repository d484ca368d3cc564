use chrono::NaiveDate;
use studio_core::{
    errors::BookingResult,
    models::{
        calendar::{format_date, parse_date},
        slots::AvailableSlots,
        time_range::TimeRange,
    },
};

use super::{Documents, WriteLock};

/// The calendar of declared bookable ranges.
#[derive(Clone)]
pub struct SlotStore {
    documents: Documents,
    lock: WriteLock,
}

impl SlotStore {
    pub(crate) fn new(documents: Documents, lock: WriteLock) -> Self {
        Self { documents, lock }
    }

    pub async fn get_all(&self) -> BookingResult<AvailableSlots> {
        self.documents.load_slots().await
    }

    /// Declared ranges of `date`, ascending.
    pub async fn ranges_for(&self, date: &str) -> BookingResult<Vec<TimeRange>> {
        let slots = self.documents.load_slots().await?;
        Ok(slots
            .ranges(date)
            .map(|ranges| ranges.iter().copied().collect())
            .unwrap_or_default())
    }

    /// Replaces the ranges of `date` with the valid entries of `raw_ranges`.
    /// Invalid entries are dropped; an empty result removes the date.
    pub async fn set_ranges<S: AsRef<str>>(&self, date: &str, raw_ranges: &[S]) -> BookingResult<()> {
        parse_date(date)?;
        let ranges = normalize_all(date, raw_ranges);

        let _guard = self.lock.lock().await;
        let mut slots = self.documents.load_slots().await?;
        slots.set(date, ranges.iter().copied());
        self.documents.save_slots(&slots).await?;

        tracing::info!("Declared {} ranges on {}", ranges.len(), date);
        Ok(())
    }

    /// Unions the valid entries of `raw_ranges` into `date`, returning how
    /// many ranges were new.
    pub async fn add_ranges<S: AsRef<str>>(&self, date: &str, raw_ranges: &[S]) -> BookingResult<usize> {
        parse_date(date)?;
        let ranges = normalize_all(date, raw_ranges);

        let _guard = self.lock.lock().await;
        let mut slots = self.documents.load_slots().await?;
        let added = slots.add(date, ranges);
        self.documents.save_slots(&slots).await?;

        tracing::info!("Added {} ranges on {}", added, date);
        Ok(added)
    }

    /// Removes ranges matching the canonical `HH:MM-HH:MM` text exactly.
    pub async fn remove_ranges<S: AsRef<str>>(&self, date: &str, ranges: &[S]) -> BookingResult<usize> {
        let _guard = self.lock.lock().await;
        let mut slots = self.documents.load_slots().await?;
        let removed = slots.remove_exact(date, ranges);
        self.documents.save_slots(&slots).await?;

        tracing::info!("Removed {} ranges on {}", removed, date);
        Ok(removed)
    }

    pub async fn clear_date(&self, date: &str) -> BookingResult<bool> {
        let _guard = self.lock.lock().await;
        let mut slots = self.documents.load_slots().await?;
        let cleared = slots.clear(date);
        self.documents.save_slots(&slots).await?;

        tracing::info!("Cleared {} (had ranges: {})", date, cleared);
        Ok(cleared)
    }

    /// Declared dates on or after `from`, ascending.
    pub async fn upcoming_dates(&self, from: NaiveDate) -> BookingResult<Vec<String>> {
        let from = format_date(from);
        let slots = self.documents.load_slots().await?;
        Ok(slots
            .dates()
            .filter(|date| *date >= from.as_str())
            .map(str::to_string)
            .collect())
    }
}

fn normalize_all<S: AsRef<str>>(date: &str, raw_ranges: &[S]) -> Vec<TimeRange> {
    raw_ranges
        .iter()
        .filter_map(|raw| match TimeRange::parse(raw.as_ref()) {
            Ok(range) => Some(range),
            Err(err) => {
                tracing::warn!("Dropping range for {}: {}", date, err);
                None
            }
        })
        .collect()
}
