//! # Slot Handlers
//!
//! Administrative management of the calendar of declared ranges. Bulk
//! edits drop invalid entries instead of failing, so the responses echo
//! the ranges actually stored for the date.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use studio_core::models::{
    admin_input::parse_slot_input,
    booking::{Booking, DaySchedule, SlotWithdrawal},
    calendar::parse_date,
    slots::AvailableSlots,
    time_range::TimeRange,
};

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Serialize, Deserialize)]
pub struct RangesRequest {
    pub ranges: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangesResponse {
    pub date: String,
    /// How many ranges the request added or removed; absent for a replace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<usize>,
    pub ranges: Vec<TimeRange>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub date: String,
    pub cleared: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuickInputRequest {
    pub input: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuickInputResponse {
    pub date: String,
    pub range: TimeRange,
    pub added: bool,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub range: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub range: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub from: Option<String>,
}

async fn ranges_response(
    state: &ApiState,
    date: String,
    changed: Option<usize>,
) -> Result<Json<RangesResponse>, AppError> {
    let ranges = state.repositories.slots.ranges_for(&date).await?;
    Ok(Json(RangesResponse { date, changed, ranges }))
}

/// `GET /api/admin/slots`
pub async fn get_all_slots(State(state): State<Arc<ApiState>>) -> Result<Json<AvailableSlots>, AppError> {
    Ok(Json(state.repositories.slots.get_all().await?))
}

/// `PUT /api/admin/slots/:date`
#[axum::debug_handler]
pub async fn set_slots(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
    Json(payload): Json<RangesRequest>,
) -> Result<Json<RangesResponse>, AppError> {
    state.repositories.slots.set_ranges(&date, &payload.ranges).await?;
    ranges_response(&state, date, None).await
}

/// `POST /api/admin/slots/:date`
pub async fn add_slots(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
    Json(payload): Json<RangesRequest>,
) -> Result<Json<RangesResponse>, AppError> {
    let added = state.repositories.slots.add_ranges(&date, &payload.ranges).await?;
    ranges_response(&state, date, Some(added)).await
}

/// `POST /api/admin/slots/:date/remove`
///
/// Only exact `HH:MM-HH:MM` texts match.
pub async fn remove_slots(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
    Json(payload): Json<RangesRequest>,
) -> Result<Json<RangesResponse>, AppError> {
    parse_date(&date)?;
    let removed = state.repositories.slots.remove_ranges(&date, &payload.ranges).await?;
    ranges_response(&state, date, Some(removed)).await
}

/// `DELETE /api/admin/slots/:date`
pub async fn clear_slots(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
) -> Result<Json<ClearResponse>, AppError> {
    parse_date(&date)?;
    let cleared = state.repositories.slots.clear_date(&date).await?;
    Ok(Json(ClearResponse { date, cleared }))
}

/// `POST /api/admin/slots/quick`, e.g. `{"input": "12.03 10:00 11:30"}`.
pub async fn quick_add_slot(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<QuickInputRequest>,
) -> Result<Json<QuickInputResponse>, AppError> {
    let today = Utc::now().date_naive();
    let input = parse_slot_input(&payload.input, today)?;

    let added = state
        .repositories
        .slots
        .add_ranges(&input.date, &[input.range.to_string()])
        .await?;

    Ok(Json(QuickInputResponse {
        date: input.date,
        range: input.range,
        added: added > 0,
    }))
}

/// `GET /api/admin/slots/:date/bookings?range=`
pub async fn slot_bookings(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    parse_date(&date)?;
    let range = TimeRange::parse(&query.range)?;

    let bookings = state.repositories.bookings.bookings_for_slot(&date, &range).await?;

    Ok(Json(bookings))
}

/// `POST /api/admin/slots/:date/withdraw`
///
/// Removes the range from the calendar and cancels the bookings on it.
#[axum::debug_handler]
pub async fn withdraw_slot(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
    Json(payload): Json<WithdrawRequest>,
) -> Result<Json<SlotWithdrawal>, AppError> {
    parse_date(&date)?;
    let range = TimeRange::parse(&payload.range)?;

    let withdrawal = state.repositories.bookings.withdraw_slot(&date, &range).await?;
    if !withdrawal.cancelled.is_empty() {
        state.notifier.bookings_cancelled(&withdrawal.cancelled).await;
    }

    Ok(Json(withdrawal))
}

/// `GET /api/admin/schedule?from=`
pub async fn schedule_overview(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<DaySchedule>>, AppError> {
    let from = query.from.as_deref().map(parse_date).transpose()?;

    let schedule = state.repositories.bookings.schedule_overview(from).await?;

    Ok(Json(schedule))
}
