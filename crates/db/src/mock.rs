use async_trait::async_trait;
use mockall::mock;
use studio_core::{
    errors::BookingResult,
    models::{booking::Booking, slots::AvailableSlots},
};

use crate::backend::Backend;

// Mock backend for failure injection in tests
mock! {
    pub Store {}

    #[async_trait]
    impl Backend for Store {
        async fn load_slots(&self) -> BookingResult<AvailableSlots>;

        async fn save_slots(&self, slots: &AvailableSlots) -> BookingResult<()>;

        async fn load_bookings(&self) -> BookingResult<Vec<Booking>>;

        async fn save_bookings(&self, bookings: &[Booking]) -> BookingResult<()>;
    }
}
