//! # Booking Handlers
//!
//! Public booking creation plus the administrative views of the ledger.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use studio_core::{
    errors::BookingError,
    models::{
        booking::{Booking, NewBooking, Reservation},
        calendar::parse_date,
        time_range::TimeRange,
    },
};

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct DateFilter {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FromQuery {
    pub from: Option<String>,
}

/// Body of a public booking request. It has no external reference: only
/// the payment webhook may key a booking by payment id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: String,
    pub time: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub comment: String,
}

impl From<BookingRequest> for NewBooking {
    fn from(request: BookingRequest) -> Self {
        NewBooking {
            date: request.date,
            time: request.time,
            name: request.name,
            phone: request.phone,
            comment: request.comment,
            external_ref: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SlotRequest {
    pub date: String,
    pub range: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelledResponse {
    pub date: String,
    pub range: TimeRange,
    pub cancelled: Vec<Booking>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingDatesResponse {
    pub dates: Vec<String>,
}

/// Reserves a slot, notifies about new bookings and picks the status code:
/// 201 when a booking was created, 200 when an earlier one was replayed.
pub(crate) async fn reserve_and_notify(
    state: &ApiState,
    request: NewBooking,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let reservation = state.repositories.bookings.reserve(request).await?;

    let status = match &reservation {
        Reservation::Created(booking) => {
            state.notifier.booking_created(booking).await;
            StatusCode::CREATED
        }
        Reservation::Replayed(_) => StatusCode::OK,
    };

    Ok((status, Json(reservation.into_booking())))
}

/// `POST /api/bookings`
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    reserve_and_notify(&state, payload.into()).await
}

/// `GET /api/admin/bookings?date=`
pub async fn list_bookings(
    State(state): State<Arc<ApiState>>,
    Query(filter): Query<DateFilter>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = match filter.date {
        Some(date) => {
            parse_date(&date)?;
            state.repositories.bookings.list_for_date(&date).await?
        }
        None => state.repositories.bookings.list_all().await?,
    };

    Ok(Json(bookings))
}

/// `DELETE /api/admin/bookings/:id`
pub async fn delete_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.repositories.bookings.delete_by_id(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(BookingError::NotFound(format!("booking {id}")).into())
    }
}

/// `POST /api/admin/bookings/cancel`
///
/// Cancels every booking on one slot; the slot itself stays declared.
pub async fn cancel_slot_bookings(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<SlotRequest>,
) -> Result<Json<CancelledResponse>, AppError> {
    parse_date(&payload.date)?;
    let range = TimeRange::parse(&payload.range)?;

    let cancelled = state
        .repositories
        .bookings
        .cancel_slot_bookings(&payload.date, &range)
        .await?;
    if !cancelled.is_empty() {
        state.notifier.bookings_cancelled(&cancelled).await;
    }

    Ok(Json(CancelledResponse {
        date: payload.date,
        range,
        cancelled,
    }))
}

/// `GET /api/admin/bookings/dates?from=`, defaulting to today.
pub async fn upcoming_booking_dates(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<FromQuery>,
) -> Result<Json<BookingDatesResponse>, AppError> {
    let from = match query.from {
        Some(from) => parse_date(&from)?,
        None => Utc::now().date_naive(),
    };

    let dates = state.repositories.bookings.upcoming_booking_dates(from).await?;

    Ok(Json(BookingDatesResponse { dates }))
}
