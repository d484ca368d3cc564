use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use studio_core::models::booking::{Booking, DaySchedule, NewBooking, SlotWithdrawal};
use studio_core::notify::BookingNotifier;
use studio_api::notify::LogNotifier;

use crate::test_utils::{DATE, MockNotifier, TestContext, test_config};

async fn book(ctx: &TestContext, date: &str, time: &str) -> Booking {
    ctx.repositories
        .bookings
        .create_booking(NewBooking {
            date: date.to_string(),
            time: time.to_string(),
            name: "Anna".to_string(),
            phone: "+7 900 123-45-67".to_string(),
            comment: String::new(),
            external_ref: None,
        })
        .await
        .unwrap()
}

#[rstest]
#[case::no_header(None)]
#[case::wrong_password(Some("guess"))]
#[tokio::test]
async fn test_admin_routes_require_password(#[case] password: Option<&'static str>) {
    let ctx = TestContext::new();

    let mut request = ctx.server.get("/api/admin/slots");
    if let Some(password) = password {
        request = request.add_header(
            HeaderName::from_static("x-admin-password"),
            HeaderValue::from_static(password),
        );
    }
    let response = request.await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_disabled_without_configured_password() {
    let notifier: Arc<dyn BookingNotifier> = Arc::new(LogNotifier);
    let ctx = TestContext::with_config(notifier, &test_config(&[]));

    let response = ctx.admin_get("/api/admin/slots").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_password_hash_is_accepted() {
    let hash = studio_api::middleware::auth::hash_password("hashed-secret").unwrap();
    let config = test_config(&[("ADMIN_PASSWORD_HASH", hash.as_str())]);
    let ctx = TestContext::with_config(Arc::new(LogNotifier), &config);

    let response = ctx
        .server
        .get("/api/admin/slots")
        .add_header(
            HeaderName::from_static("x-admin-password"),
            HeaderValue::from_static("hashed-secret"),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_set_slots_replaces_and_normalizes() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["18:00-19:00"]).await;

    let response = ctx
        .admin_put(&format!("/api/admin/slots/{DATE}"))
        .json(&json!({ "ranges": ["10:00-11:00", "09:00", "bad"] }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "date": DATE,
        "ranges": ["09:00-10:00", "10:00-11:00"],
    }));
}

#[tokio::test]
async fn test_add_and_remove_slots_report_changes() {
    let ctx = TestContext::new();

    let added = ctx
        .admin_post(&format!("/api/admin/slots/{DATE}"))
        .json(&json!({ "ranges": ["09:00-10:00", "10:00-11:00"] }))
        .await;
    added.assert_status_ok();
    assert_eq!(added.json::<Value>()["changed"], json!(2));

    let removed = ctx
        .admin_post(&format!("/api/admin/slots/{DATE}/remove"))
        .json(&json!({ "ranges": ["09:00-10:00", "09:00"] }))
        .await;
    removed.assert_status_ok();
    removed.assert_json(&json!({
        "date": DATE,
        "changed": 1,
        "ranges": ["10:00-11:00"],
    }));
}

#[tokio::test]
async fn test_set_slots_rejects_malformed_date() {
    let ctx = TestContext::new();

    let response = ctx
        .admin_put("/api/admin/slots/2025-3-10")
        .json(&json!({ "ranges": ["09:00-10:00"] }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_slots_and_list_calendar() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00"]).await;
    ctx.declare("2025-03-11", &["12:00-13:00"]).await;

    let cleared = ctx.admin_delete(&format!("/api/admin/slots/{DATE}")).await;
    cleared.assert_json(&json!({ "date": DATE, "cleared": true }));

    let all = ctx.admin_get("/api/admin/slots").await;
    all.assert_json(&json!({ "2025-03-11": ["12:00-13:00"] }));
}

#[rstest]
#[case::dotted_with_year("10.03.2025 10:00 11:30", "2025-03-10", "10:00-11:30")]
#[case::iso_single_time("2025-03-10 09:00", "2025-03-10", "09:00-10:00")]
#[tokio::test]
async fn test_quick_input_declares_slot(#[case] input: &str, #[case] date: &str, #[case] range: &str) {
    let ctx = TestContext::new();

    let response = ctx
        .admin_post("/api/admin/slots/quick")
        .json(&json!({ "input": input }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "date": date, "range": range, "added": true }));
    let ranges = ctx.repositories.slots.ranges_for(date).await.unwrap();
    assert_eq!(ranges.len(), 1);
}

#[tokio::test]
async fn test_quick_input_rejects_gibberish() {
    let ctx = TestContext::new();

    let response = ctx
        .admin_post("/api/admin/slots/quick")
        .json(&json!({ "input": "tomorrow morning please" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_schedule_overview_from_date() {
    let ctx = TestContext::new();
    ctx.declare("2025-03-09", &["09:00-10:00"]).await;
    ctx.declare(DATE, &["09:00-10:00", "10:00-11:00"]).await;
    book(&ctx, DATE, "10:00-11:00").await;

    let response = ctx.admin_get("/api/admin/schedule?from=2025-03-10").await;

    response.assert_status_ok();
    let schedule: Vec<DaySchedule> = response.json();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].date, DATE);
    assert_eq!(schedule[0].free[0].to_string(), "09:00-10:00");
    assert_eq!(schedule[0].taken[0].to_string(), "10:00-11:00");
}

#[tokio::test]
async fn test_list_bookings_filters_by_date() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00"]).await;
    ctx.declare("2025-03-11", &["09:00-10:00"]).await;
    let booking = book(&ctx, DATE, "09:00-10:00").await;
    book(&ctx, "2025-03-11", "09:00-10:00").await;

    let all = ctx.admin_get("/api/admin/bookings").await;
    assert_eq!(all.json::<Vec<Booking>>().len(), 2);

    let filtered = ctx.admin_get(&format!("/api/admin/bookings?date={DATE}")).await;
    assert_eq!(filtered.json::<Vec<Booking>>(), vec![booking]);
}

#[tokio::test]
async fn test_delete_booking_frees_slot() {
    let ctx = TestContext::new();
    ctx.declare(DATE, &["09:00-10:00"]).await;
    let booking = book(&ctx, DATE, "09:00-10:00").await;

    let deleted = ctx
        .admin_delete(&format!("/api/admin/bookings/{}", booking.id))
        .await;
    deleted.assert_status(StatusCode::NO_CONTENT);

    let again = ctx
        .admin_delete(&format!("/api/admin/bookings/{}", booking.id))
        .await;
    again.assert_status(StatusCode::NOT_FOUND);

    let available = ctx.repositories.bookings.get_available(DATE).await.unwrap();
    assert_eq!(available.len(), 1);
}

#[tokio::test]
async fn test_cancel_slot_bookings_notifies_clients() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_bookings_cancelled()
        .withf(|bookings| bookings.len() == 1)
        .times(1)
        .return_const(());
    let ctx = TestContext::with_notifier(Arc::new(notifier));
    ctx.declare(DATE, &["09:00-10:00"]).await;
    let booking = book(&ctx, DATE, "09:00-10:00").await;

    let preview = ctx
        .admin_get(&format!("/api/admin/slots/{DATE}/bookings?range=09:00-10:00"))
        .await;
    assert_eq!(preview.json::<Vec<Booking>>(), vec![booking.clone()]);

    let response = ctx
        .admin_post("/api/admin/bookings/cancel")
        .json(&json!({ "date": DATE, "range": "09:00-10:00" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["cancelled"][0]["id"], json!(booking.id));
    assert_eq!(ctx.repositories.slots.ranges_for(DATE).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_withdraw_slot_removes_range_and_bookings() {
    let mut notifier = MockNotifier::new();
    notifier
        .expect_bookings_cancelled()
        .times(1)
        .return_const(());
    let ctx = TestContext::with_notifier(Arc::new(notifier));
    ctx.declare(DATE, &["09:00-10:00", "10:00-11:00"]).await;
    let booking = book(&ctx, DATE, "10:00-11:00").await;

    let response = ctx
        .admin_post(&format!("/api/admin/slots/{DATE}/withdraw"))
        .json(&json!({ "range": "10:00-11:00" }))
        .await;

    response.assert_status_ok();
    let withdrawal: SlotWithdrawal = response.json();
    assert!(withdrawal.slot_removed);
    assert_eq!(withdrawal.cancelled, vec![booking]);

    let available = ctx.server.get(&format!("/api/slots/{DATE}")).await;
    available.assert_json(&json!({ "date": DATE, "available": ["09:00-10:00"] }));
}

#[tokio::test]
async fn test_upcoming_booking_dates() {
    let ctx = TestContext::new();
    for date in ["2025-03-08", DATE, "2025-03-12"] {
        ctx.declare(date, &["09:00-10:00"]).await;
        book(&ctx, date, "09:00-10:00").await;
    }

    let response = ctx.admin_get("/api/admin/bookings/dates?from=2025-03-09").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "dates": [DATE, "2025-03-12"] }));
}
