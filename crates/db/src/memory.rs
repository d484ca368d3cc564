use async_trait::async_trait;
use studio_core::{
    errors::BookingResult,
    models::{booking::Booking, slots::AvailableSlots},
};
use tokio::sync::Mutex;

use crate::backend::Backend;

/// Keeps both documents in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<AvailableSlots>,
    bookings: Mutex<Vec<Booking>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn load_slots(&self) -> BookingResult<AvailableSlots> {
        Ok(self.slots.lock().await.clone())
    }

    async fn save_slots(&self, slots: &AvailableSlots) -> BookingResult<()> {
        *self.slots.lock().await = slots.clone();
        Ok(())
    }

    async fn load_bookings(&self) -> BookingResult<Vec<Booking>> {
        Ok(self.bookings.lock().await.clone())
    }

    async fn save_bookings(&self, bookings: &[Booking]) -> BookingResult<()> {
        *self.bookings.lock().await = bookings.to_vec();
        Ok(())
    }
}
