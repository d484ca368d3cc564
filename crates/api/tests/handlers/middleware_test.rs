use axum::{body::to_bytes, http::StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use studio_api::middleware::{auth, error_handling::map_error};
use studio_core::errors::BookingError;

#[rstest]
#[case::invalid_time(BookingError::InvalidTimeFormat("25:00".into()), StatusCode::BAD_REQUEST)]
#[case::validation(BookingError::Validation("name must not be empty".into()), StatusCode::BAD_REQUEST)]
#[case::slot_unavailable(
    BookingError::SlotUnavailable { date: "2025-03-10".into(), range: "09:00-10:00".into() },
    StatusCode::CONFLICT
)]
#[case::not_found(BookingError::NotFound("booking 42".into()), StatusCode::NOT_FOUND)]
#[case::authentication(BookingError::Authentication("invalid admin password".into()), StatusCode::UNAUTHORIZED)]
#[case::corrupt(
    BookingError::StoreCorrupt { store: "bookings.json".into(), reason: "EOF".into() },
    StatusCode::INTERNAL_SERVER_ERROR
)]
#[case::storage(BookingError::Storage(eyre::eyre!("disk full")), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn test_error_status_mapping(#[case] error: BookingError, #[case] status: StatusCode) {
    let response = map_error(error);

    assert_eq!(response.status(), status);
}

#[tokio::test]
async fn test_user_facing_error_message_is_returned() {
    let response = map_error(BookingError::SlotUnavailable {
        date: "2025-03-10".into(),
        range: "09:00-10:00".into(),
    });

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({ "error": "Slot unavailable: 09:00-10:00 on 2025-03-10 is not free, choose another time" })
    );
}

#[tokio::test]
async fn test_server_error_details_are_hidden() {
    let response = map_error(BookingError::Storage(eyre::eyre!("/var/data/bookings.json: permission denied")));

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "Internal server error" }));
}

#[test]
fn test_password_hash_round_trip() {
    let hash = auth::hash_password("correct horse").unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(auth::verify_password("correct horse", &hash).unwrap());
    assert!(!auth::verify_password("battery staple", &hash).unwrap());
}

#[test]
fn test_verify_rejects_malformed_hash() {
    assert!(auth::verify_password("anything", "not-a-phc-string").is_err());
}
