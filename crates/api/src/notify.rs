use async_trait::async_trait;
use studio_core::{models::booking::Booking, notify::BookingNotifier};

/// Writes booking events to the log. Used when no messaging channel is wired in.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn booking_created(&self, booking: &Booking) {
        tracing::info!(
            "New booking {}: {} {} for {} ({})",
            booking.id,
            booking.date,
            booking.time,
            booking.name,
            booking.phone
        );
    }

    async fn bookings_cancelled(&self, bookings: &[Booking]) {
        for booking in bookings {
            tracing::info!(
                "Booking {} cancelled: {} {}, contact {} ({})",
                booking.id,
                booking.date,
                booking.time,
                booking.name,
                booking.phone
            );
        }
    }
}
