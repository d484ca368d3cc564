use chrono::{NaiveDate, Utc};
use studio_core::{
    errors::{BookingError, BookingResult},
    models::{
        availability::{OverlapPolicy, free_ranges, taken_ranges},
        booking::{Booking, DaySchedule, NewBooking, Reservation, SlotWithdrawal},
        calendar::format_date,
        slots::AvailableSlots,
        time_range::TimeRange,
    },
};

use super::{Documents, WriteLock};

/// Confirmed reservations and the availability derived from them.
#[derive(Clone)]
pub struct BookingLedger {
    documents: Documents,
    lock: WriteLock,
    overlap_policy: OverlapPolicy,
}

impl BookingLedger {
    pub(crate) fn new(documents: Documents, lock: WriteLock, overlap_policy: OverlapPolicy) -> Self {
        Self {
            documents,
            lock,
            overlap_policy,
        }
    }

    pub fn overlap_policy(&self) -> OverlapPolicy {
        self.overlap_policy
    }

    /// Declared ranges of `date` not consumed by a booking, ascending.
    pub async fn get_available(&self, date: &str) -> BookingResult<Vec<TimeRange>> {
        let slots = self.documents.load_slots().await?;
        let bookings = self.documents.load_bookings().await?;
        Ok(self.available_in(&slots, &bookings, date))
    }

    pub async fn create_booking(&self, request: NewBooking) -> BookingResult<Booking> {
        Ok(self.reserve(request).await?.into_booking())
    }

    /// Books a free range, or replays the booking already carrying the
    /// request's external reference.
    ///
    /// The reference lookup, the availability check and the append happen
    /// under the write lock, so concurrent requests for one range cannot
    /// both succeed.
    pub async fn reserve(&self, request: NewBooking) -> BookingResult<Reservation> {
        let time = request.validate()?;

        let _guard = self.lock.lock().await;
        let mut bookings = self.documents.load_bookings().await?;

        if let Some(reference) = request.external_ref() {
            if let Some(existing) = bookings
                .iter()
                .find(|booking| booking.external_ref.as_deref() == Some(reference))
            {
                if !existing.occupies(&request.date, &time) {
                    tracing::warn!(
                        "Reference {} replayed for {} {} but booking {} holds {} {}",
                        reference,
                        request.date,
                        time,
                        existing.id,
                        existing.date,
                        existing.time
                    );
                }
                tracing::info!("Replaying booking {} for reference {}", existing.id, reference);
                return Ok(Reservation::Replayed(existing.clone()));
            }
        }

        let slots = self.documents.load_slots().await?;
        if !self.available_in(&slots, &bookings, &request.date).contains(&time) {
            tracing::debug!("{} on {} is not available", time, request.date);
            return Err(BookingError::SlotUnavailable {
                date: request.date,
                range: time.to_string(),
            });
        }

        let booking = Booking::from_request(&request, time, Utc::now());
        bookings.push(booking.clone());
        self.documents.save_bookings(&bookings).await?;

        tracing::info!("Created booking {} for {} {}", booking.id, booking.date, booking.time);
        Ok(Reservation::Created(booking))
    }

    /// All bookings ordered by date, then time.
    pub async fn list_all(&self) -> BookingResult<Vec<Booking>> {
        let mut bookings = self.documents.load_bookings().await?;
        sort_bookings(&mut bookings);
        Ok(bookings)
    }

    pub async fn list_for_date(&self, date: &str) -> BookingResult<Vec<Booking>> {
        let mut bookings = self.list_all().await?;
        bookings.retain(|booking| booking.date == date);
        Ok(bookings)
    }

    /// Removes the booking with `id`, returning whether one was found.
    pub async fn delete_by_id(&self, id: &str) -> BookingResult<bool> {
        let _guard = self.lock.lock().await;
        let mut bookings = self.documents.load_bookings().await?;

        let before = bookings.len();
        bookings.retain(|booking| booking.id != id);
        if bookings.len() == before {
            tracing::debug!("No booking {} to delete", id);
            return Ok(false);
        }

        self.documents.save_bookings(&bookings).await?;
        tracing::info!("Deleted booking {}", id);
        Ok(true)
    }

    /// Free and taken ranges for every declared date, optionally only those
    /// on or after `from`.
    pub async fn schedule_overview(&self, from: Option<NaiveDate>) -> BookingResult<Vec<DaySchedule>> {
        let from = from.map(format_date);
        let slots = self.documents.load_slots().await?;
        let bookings = self.documents.load_bookings().await?;

        Ok(slots
            .iter()
            .filter(|(date, _)| from.as_deref().is_none_or(|from| *date >= from))
            .map(|(date, declared)| {
                let booked = booked_ranges(&bookings, date);
                DaySchedule {
                    date: date.to_string(),
                    free: free_ranges(declared, &booked, self.overlap_policy),
                    taken: taken_ranges(declared, &booked, self.overlap_policy),
                }
            })
            .collect())
    }

    /// Bookings holding exactly `range` on `date`.
    pub async fn bookings_for_slot(&self, date: &str, range: &TimeRange) -> BookingResult<Vec<Booking>> {
        let mut bookings = self.documents.load_bookings().await?;
        bookings.retain(|booking| booking.occupies(date, range));
        sort_bookings(&mut bookings);
        Ok(bookings)
    }

    /// Cancels every booking holding `range` on `date` and returns them.
    pub async fn cancel_slot_bookings(&self, date: &str, range: &TimeRange) -> BookingResult<Vec<Booking>> {
        let _guard = self.lock.lock().await;
        let bookings = self.documents.load_bookings().await?;

        let (cancelled, remaining): (Vec<Booking>, Vec<Booking>) = bookings
            .into_iter()
            .partition(|booking| booking.occupies(date, range));
        if !cancelled.is_empty() {
            self.documents.save_bookings(&remaining).await?;
            tracing::info!("Cancelled {} bookings on {} {}", cancelled.len(), date, range);
        }

        Ok(cancelled)
    }

    /// Removes `range` from the calendar and cancels its bookings in one
    /// critical section.
    pub async fn withdraw_slot(&self, date: &str, range: &TimeRange) -> BookingResult<SlotWithdrawal> {
        let _guard = self.lock.lock().await;
        let mut slots = self.documents.load_slots().await?;
        let bookings = self.documents.load_bookings().await?;

        let (mut cancelled, remaining): (Vec<Booking>, Vec<Booking>) = bookings
            .into_iter()
            .partition(|booking| booking.occupies(date, range));
        let slot_removed = slots.remove(date, range);

        // Bookings first: a failed slot save leaves the range declared but
        // free, and withdrawing again finishes the job.
        if !cancelled.is_empty() {
            self.documents.save_bookings(&remaining).await?;
        }
        if slot_removed {
            self.documents.save_slots(&slots).await?;
        }
        sort_bookings(&mut cancelled);

        tracing::info!(
            "Withdrew {} on {} (declared: {}, bookings cancelled: {})",
            range,
            date,
            slot_removed,
            cancelled.len()
        );
        Ok(SlotWithdrawal {
            date: date.to_string(),
            range: *range,
            slot_removed,
            cancelled,
        })
    }

    /// Distinct dates with bookings on or after `from`, ascending.
    pub async fn upcoming_booking_dates(&self, from: NaiveDate) -> BookingResult<Vec<String>> {
        let from = format_date(from);
        let mut dates: Vec<String> = self
            .documents
            .load_bookings()
            .await?
            .into_iter()
            .map(|booking| booking.date)
            .filter(|date| *date >= from)
            .collect();
        dates.sort();
        dates.dedup();
        Ok(dates)
    }

    fn available_in(&self, slots: &AvailableSlots, bookings: &[Booking], date: &str) -> Vec<TimeRange> {
        match slots.ranges(date) {
            Some(declared) => free_ranges(declared, &booked_ranges(bookings, date), self.overlap_policy),
            None => Vec::new(),
        }
    }
}

fn booked_ranges(bookings: &[Booking], date: &str) -> Vec<TimeRange> {
    bookings
        .iter()
        .filter(|booking| booking.date == date)
        .map(|booking| booking.time)
        .collect()
}

fn sort_bookings(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        (a.date.as_str(), a.time, a.created_at).cmp(&(b.date.as_str(), b.time, b.created_at))
    });
}
