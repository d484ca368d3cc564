use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use studio_core::models::booking::Booking;

use crate::test_utils::{
    DATE, MockNotifier, TestContext, WEBHOOK_SECRET, booking_body, payment_body, webhook_header,
};

#[tokio::test]
async fn test_create_booking_returns_created_booking() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00", "10:00-11:00"]).await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&json!({
            "date": DATE,
            "time": "09:00-10:00",
            "name": "Anna",
            "phone": "+7 900 123-45-67",
            "comment": "first visit",
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let booking: Booking = response.json();
    assert_eq!(booking.date, DATE);
    assert_eq!(booking.time.to_string(), "09:00-10:00");
    assert_eq!(booking.name, "Anna");
    assert_eq!(booking.comment, "first visit");
    assert!(!booking.id.is_empty());

    let stored = ctx.repositories.bookings.list_all().await.unwrap();
    assert_eq!(stored, vec![booking]);
}

#[tokio::test]
async fn test_booking_taken_range_conflicts() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00"]).await;
    ctx.server
        .post("/api/bookings")
        .json(&booking_body(DATE, "09:00-10:00"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_body(DATE, "09:00-10:00"))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("choose another time"));
}

#[rstest]
#[case::reversed_range("10:00-09:00", StatusCode::BAD_REQUEST)]
#[case::garbage_time("soon", StatusCode::BAD_REQUEST)]
#[case::undeclared_range("15:00-16:00", StatusCode::CONFLICT)]
#[tokio::test]
async fn test_rejected_bookings(#[case] time: &str, #[case] status: StatusCode) {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00"]).await;

    let response = ctx
        .server
        .post("/api/bookings")
        .json(&booking_body(DATE, time))
        .await;

    response.assert_status(status);
    assert!(ctx.repositories.bookings.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_without_phone_is_rejected() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00"]).await;
    let mut body = booking_body(DATE, "09:00-10:00");
    body["phone"] = json!("  ");

    let response = ctx.server.post("/api/bookings").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_public_booking_ignores_external_ref() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00", "10:00-11:00"]).await;
    let (name, value) = webhook_header(WEBHOOK_SECRET);
    let paid: Booking = ctx
        .server
        .post("/api/payments/confirm")
        .add_header(name, value)
        .json(&payment_body("pay-42", DATE, "09:00-10:00"))
        .await
        .json();

    let mut replay = booking_body(DATE, "09:00-10:00");
    replay["external_ref"] = json!("pay-42");
    let response = ctx.server.post("/api/bookings").json(&replay).await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body.get("phone"), None);

    let mut claim = booking_body(DATE, "10:00-11:00");
    claim["external_ref"] = json!("pay-99");
    let created = ctx.server.post("/api/bookings").json(&claim).await;

    created.assert_status(StatusCode::CREATED);
    assert_eq!(created.json::<Booking>().external_ref, None);
    let stored = ctx.repositories.bookings.list_all().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0], paid);
}

#[tokio::test]
async fn test_notifier_hears_only_new_bookings() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_booking_created()
        .withf(|booking| booking.external_ref.as_deref() == Some("order-1"))
        .times(1)
        .return_const(());
    let ctx = TestContext::with_notifier(Arc::new(notifier));
    ctx.declare(DATE, &["09:00-10:00"]).await;
    let body = payment_body("order-1", DATE, "09:00-10:00");

    let (name, value) = webhook_header(WEBHOOK_SECRET);
    let first = ctx
        .server
        .post("/api/payments/confirm")
        .add_header(name.clone(), value.clone())
        .json(&body)
        .await;
    let replay = ctx
        .server
        .post("/api/payments/confirm")
        .add_header(name, value)
        .json(&body)
        .await;

    first.assert_status(StatusCode::CREATED);
    replay.assert_status_ok();
    assert_eq!(first.json::<Booking>().id, replay.json::<Booking>().id);
}
