use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use studio_api::{handlers::availability::AvailabilityResponse, notify::LogNotifier};
use studio_core::errors::BookingError;
use studio_db::mock::MockStore;

use crate::test_utils::{DATE, TestContext, booking_body, test_config};

#[tokio::test]
async fn test_available_ranges_for_declared_date() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["10:00-11:00", "09:00"]).await;

    let response = ctx.server.get(&format!("/api/slots/{DATE}")).await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "date": DATE,
        "available": ["09:00-10:00", "10:00-11:00"],
    }));
}

#[tokio::test]
async fn test_booked_range_is_no_longer_available() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00", "10:00-11:00"]).await;
    ctx.server
        .post("/api/bookings")
        .json(&booking_body(DATE, "09:00-10:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx.server.get(&format!("/api/slots/{DATE}")).await;

    let body: AvailabilityResponse = response.json();
    let available: Vec<String> = body.available.iter().map(ToString::to_string).collect();
    assert_eq!(available, vec!["10:00-11:00"]);
}

#[tokio::test]
async fn test_undeclared_date_has_nothing_available() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/slots/2025-03-11").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["available"], json!([]));
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/slots/10.03.2025").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("10.03.2025"));
}

#[tokio::test]
async fn test_health_reports_storage() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok", "storage": "ok" }));
}

#[tokio::test]
async fn test_health_hides_storage_failure_details() {
    let mut store = MockStore::new();
    store.expect_load_slots().returning(|| {
        Err(BookingError::StoreCorrupt {
            store: "/srv/studio/available-slots.json".to_string(),
            reason: "expected value at line 1 column 1".to_string(),
        })
    });
    let ctx = TestContext::with_backend(Arc::new(store), Arc::new(LogNotifier), &test_config(&[]));

    let response = ctx.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response.assert_json(&json!({ "status": "degraded", "storage": "unavailable" }));
}
