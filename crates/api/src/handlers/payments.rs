//! # Payment Handlers
//!
//! The payment provider calls back once per confirmed payment and retries
//! on failure. The payment id is the booking's external reference, so a
//! retried callback returns the booking created by the first one.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use studio_core::{
    errors::BookingError,
    models::booking::{Booking, NewBooking},
};

use crate::{
    ApiState,
    handlers::bookings::reserve_and_notify,
    middleware::{auth::verify_webhook_secret, error_handling::AppError},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub payment_id: String,
    pub date: String,
    pub time: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub comment: String,
}

impl From<PaymentConfirmation> for NewBooking {
    fn from(payment: PaymentConfirmation) -> Self {
        NewBooking {
            date: payment.date,
            time: payment.time,
            name: payment.name,
            phone: payment.phone,
            comment: payment.comment,
            external_ref: Some(payment.payment_id),
        }
    }
}

/// `POST /api/payments/confirm`
#[axum::debug_handler]
pub async fn confirm_payment(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    Json(payload): Json<PaymentConfirmation>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    verify_webhook_secret(&state, &headers)?;

    if payload.payment_id.trim().is_empty() {
        return Err(BookingError::Validation("payment_id must not be empty".to_string()).into());
    }

    tracing::debug!("Payment {} confirmed for {} {}", payload.payment_id, payload.date, payload.time);
    reserve_and_notify(&state, payload.into()).await
}
