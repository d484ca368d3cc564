//! # Authentication Module
//!
//! Argon2 password hashing for the admin password, the middleware guarding
//! the admin routes, and the shared-secret check for payment webhooks.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use constant_time_eq::constant_time_eq;
use eyre::Result;
use studio_core::errors::BookingError;

use crate::{ApiState, middleware::error_handling::AppError};

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Hashes a password using the Argon2 algorithm
///
/// Returns the PHC string (algorithm, parameters, salt and hash).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a PHC hash produced by [`hash_password`].
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Rejects admin requests without a valid `x-admin-password` header.
pub async fn require_admin(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(password_hash) = state.admin_password_hash.as_deref() else {
        tracing::warn!("Admin request rejected: no admin password configured");
        return Err(BookingError::Authentication("admin access is not configured".to_string()).into());
    };

    let password = header_value(request.headers(), ADMIN_PASSWORD_HEADER)
        .ok_or_else(|| BookingError::Authentication("missing admin password".to_string()))?;

    if !verify_password(password, password_hash)? {
        tracing::warn!("Admin request rejected: wrong password for {}", request.uri().path());
        return Err(BookingError::Authentication("invalid admin password".to_string()).into());
    }

    Ok(next.run(request).await)
}

/// Checks the payment provider's shared secret.
pub fn verify_webhook_secret(state: &ApiState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = state.payment_webhook_secret.as_deref() else {
        tracing::warn!("Payment confirmation rejected: no webhook secret configured");
        return Err(BookingError::Authentication("payment webhook is not configured".to_string()).into());
    };

    match header_value(headers, WEBHOOK_SECRET_HEADER) {
        Some(secret) if constant_time_eq(secret.as_bytes(), expected.as_bytes()) => Ok(()),
        _ => {
            tracing::warn!("Payment confirmation rejected: bad webhook secret");
            Err(BookingError::Authentication("invalid webhook secret".to_string()).into())
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
