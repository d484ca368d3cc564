//! # Availability Handlers
//!
//! Public read of the free ranges of one date: the declared ranges minus
//! those already consumed by bookings.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use studio_core::models::{calendar::parse_date, time_range::TimeRange};

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub available: Vec<TimeRange>,
}

/// `GET /api/slots/:date`
///
/// A date with nothing declared yields an empty list, a malformed date a 400.
#[axum::debug_handler]
pub async fn get_available(
    State(state): State<Arc<ApiState>>,
    Path(date): Path<String>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    parse_date(&date)?;

    let available = state.repositories.bookings.get_available(&date).await?;

    Ok(Json(AvailabilityResponse { date, available }))
}
