use std::str::FromStr;

use async_trait::async_trait;
use studio_core::{
    errors::{BookingError, BookingResult},
    models::{booking::Booking, slots::AvailableSlots},
};

/// Whole-document persistence for the slot calendar and the booking ledger.
///
/// Every save replaces the entire collection. Implementations report a
/// document that fails to decode as [`BookingError::StoreCorrupt`] and any
/// other failure as [`BookingError::Storage`].
#[async_trait]
pub trait Backend: Send + Sync {
    async fn load_slots(&self) -> BookingResult<AvailableSlots>;

    async fn save_slots(&self, slots: &AvailableSlots) -> BookingResult<()>;

    async fn load_bookings(&self) -> BookingResult<Vec<Booking>>;

    async fn save_bookings(&self, bookings: &[Booking]) -> BookingResult<()>;
}

/// What to do when a persisted document cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CorruptStorePolicy {
    /// Fail the request with `StoreCorrupt`.
    #[default]
    Fail,
    /// Log the corruption and continue as if the document were empty.
    /// The next write replaces the corrupt document.
    TreatAsEmpty,
}

impl FromStr for CorruptStorePolicy {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" => Ok(CorruptStorePolicy::Fail),
            "empty" | "treat-as-empty" => Ok(CorruptStorePolicy::TreatAsEmpty),
            other => Err(BookingError::Validation(format!(
                "unknown corrupt store policy '{other}', expected 'fail' or 'empty'"
            ))),
        }
    }
}

/// Copies both documents from one backend into another, returning the
/// number of declared dates and bookings written.
pub async fn copy_documents(from: &dyn Backend, to: &dyn Backend) -> BookingResult<(usize, usize)> {
    let slots = from.load_slots().await?;
    let bookings = from.load_bookings().await?;

    to.save_slots(&slots).await?;
    to.save_bookings(&bookings).await?;

    tracing::info!(
        "Copied {} declared dates and {} bookings",
        slots.len(),
        bookings.len()
    );
    Ok((slots.len(), bookings.len()))
}
