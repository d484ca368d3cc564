use async_trait::async_trait;

use crate::models::booking::Booking;

/// Receives bookings after they are newly persisted.
///
/// Delivery failures are the notifier's concern: a booking that has been
/// written is never rolled back because a notification could not be sent.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking);

    async fn bookings_cancelled(&self, bookings: &[Booking]);
}
