use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use studio_core::{
    errors::{BookingError, BookingResult},
    models::{booking::Booking, time_range::TimeRange},
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSlot {
    pub date: String,
    pub time_range: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: String,
    pub date: String,
    pub time_range: String,
    pub name: String,
    pub phone: String,
    pub comment: String,
    pub external_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DbSlot {
    pub fn time_range(&self) -> BookingResult<TimeRange> {
        parse_stored_range("available_slots", &self.time_range)
    }
}

impl DbBooking {
    pub fn into_booking(self) -> BookingResult<Booking> {
        let time = parse_stored_range("bookings", &self.time_range)?;
        Ok(Booking {
            id: self.id,
            date: self.date,
            time,
            name: self.name,
            phone: self.phone,
            comment: self.comment,
            external_ref: self.external_ref,
            created_at: self.created_at,
        })
    }
}

impl From<&Booking> for DbBooking {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            date: booking.date.clone(),
            time_range: booking.time.to_string(),
            name: booking.name.clone(),
            phone: booking.phone.clone(),
            comment: booking.comment.clone(),
            external_ref: booking.external_ref.clone(),
            created_at: booking.created_at,
        }
    }
}

fn parse_stored_range(table: &str, text: &str) -> BookingResult<TimeRange> {
    TimeRange::parse(text).map_err(|err| BookingError::StoreCorrupt {
        store: table.to_string(),
        reason: err.to_string(),
    })
}
