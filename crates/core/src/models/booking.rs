use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{BookingError, BookingResult},
    models::{calendar::parse_date, time_range::TimeRange},
};

/// A confirmed reservation of one slot. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub date: String,
    pub time: TimeRange,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "paymentId")]
    pub external_ref: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Builds a fresh booking for an already validated request.
    pub fn from_request(request: &NewBooking, time: TimeRange, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: request.date.clone(),
            time,
            name: request.name.trim().to_string(),
            phone: request.phone.trim().to_string(),
            comment: request.comment.trim().to_string(),
            external_ref: request.external_ref().map(str::to_string),
            created_at,
        }
    }

    pub fn occupies(&self, date: &str, range: &TimeRange) -> bool {
        self.date == date && self.time == *range
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub date: String,
    pub time: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub external_ref: Option<String>,
}

impl NewBooking {
    /// Checks the request and returns its normalized time range.
    pub fn validate(&self) -> BookingResult<TimeRange> {
        let time = TimeRange::parse(&self.time)?;
        parse_date(&self.date)?;

        if self.name.trim().is_empty() {
            return Err(BookingError::Validation("name must not be empty".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(BookingError::Validation("phone must not be empty".to_string()));
        }

        Ok(time)
    }

    /// The idempotence key, ignoring blank values.
    pub fn external_ref(&self) -> Option<&str> {
        self.external_ref
            .as_deref()
            .map(str::trim)
            .filter(|reference| !reference.is_empty())
    }
}

/// Outcome of a reservation attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// A new booking was appended to the ledger.
    Created(Booking),
    /// The external reference matched an existing booking, which is returned unchanged.
    Replayed(Booking),
}

impl Reservation {
    pub fn booking(&self) -> &Booking {
        match self {
            Reservation::Created(booking) | Reservation::Replayed(booking) => booking,
        }
    }

    pub fn into_booking(self) -> Booking {
        match self {
            Reservation::Created(booking) | Reservation::Replayed(booking) => booking,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Reservation::Created(_))
    }
}

/// Free and taken ranges of one declared date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub date: String,
    pub free: Vec<TimeRange>,
    pub taken: Vec<TimeRange>,
}

/// Result of removing a declared range together with its bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWithdrawal {
    pub date: String,
    pub range: TimeRange,
    pub slot_removed: bool,
    pub cancelled: Vec<Booking>,
}
