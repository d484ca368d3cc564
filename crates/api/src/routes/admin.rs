use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, middleware::auth::require_admin, ApiState};

/// Every route here requires the admin password.
pub fn routes(state: Arc<ApiState>) -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/admin/slots", get(handlers::slots::get_all_slots))
        .route(
            "/api/admin/slots/quick",
            post(handlers::slots::quick_add_slot),
        )
        .route(
            "/api/admin/slots/:date",
            post(handlers::slots::add_slots)
                .put(handlers::slots::set_slots)
                .delete(handlers::slots::clear_slots),
        )
        .route(
            "/api/admin/slots/:date/remove",
            post(handlers::slots::remove_slots),
        )
        .route(
            "/api/admin/slots/:date/bookings",
            get(handlers::slots::slot_bookings),
        )
        .route(
            "/api/admin/slots/:date/withdraw",
            post(handlers::slots::withdraw_slot),
        )
        .route(
            "/api/admin/schedule",
            get(handlers::slots::schedule_overview),
        )
        .route("/api/admin/bookings", get(handlers::bookings::list_bookings))
        .route(
            "/api/admin/bookings/cancel",
            post(handlers::bookings::cancel_slot_bookings),
        )
        .route(
            "/api/admin/bookings/dates",
            get(handlers::bookings::upcoming_booking_dates),
        )
        .route(
            "/api/admin/bookings/:id",
            delete(handlers::bookings::delete_booking),
        )
        .route_layer(from_fn_with_state(state, require_admin))
}
