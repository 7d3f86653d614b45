mod common;

use chrono::NaiveDate;
use common::{app_for, spawn_api};
use rental_client::pages::BookingActions;
use rental_client::{ClientError, MemoryTokenStorage, PushEvent};
use serde_json::json;
use shared::models::{BookingStatus, PaymentMethod};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

async fn logged_in() -> (rental_client::AdminApp, Arc<common::MockState>) {
    let (api, state) = spawn_api().await;
    let (app, _) = app_for(&api, Arc::new(MemoryTokenStorage::new()));
    assert!(app.login("admin", "secret").await.success);
    (app, state)
}

#[tokio::test]
async fn test_cancel_with_reason() {
    let (app, state) = logged_in().await;
    let mut page = app.bookings_page();
    page.load().await.unwrap();

    page.cancel("b1", "duplicate entry").await.unwrap();

    let booking = page.find("b1").unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(booking.admin_notes.as_deref(), Some("duplicate entry"));
    assert!(!BookingActions::for_booking(booking).cancel);
    assert!(page.warnings().is_empty());

    // Second attempt never reaches the server
    let err = page.cancel("b1", "again").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(state.cancel_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_blank_reason_sends_nothing() {
    let (app, state) = logged_in().await;
    let mut page = app.bookings_page();
    page.load().await.unwrap();

    let err = page.cancel("b1", "   ").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(page.state.error.as_deref(), Some("Cancellation reason is required"));
    assert_eq!(state.cancel_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_server_wins_over_optimistic_cancel() {
    let (app, state) = logged_in().await;
    *state.ignore_cancel.lock() = true;

    let mut page = app.bookings_page();
    page.load().await.unwrap();
    page.cancel("b1", "customer called").await.unwrap();

    let booking = page.find("b1").unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(page.warnings().len(), 1);
    let warning = &page.warnings()[0];
    assert_eq!(warning.booking_id, "b1");
    assert_eq!(warning.expected_reason, "customer called");
    assert_eq!(warning.actual_status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_verify_payment_confirms_pending_booking() {
    let (app, state) = logged_in().await;
    let mut page = app.bookings_page();
    page.load().await.unwrap();
    assert!(BookingActions::for_booking(page.find("b1").unwrap()).verify_payment);

    page.verify_payment("b1", "cash", "500").await.unwrap();

    assert_eq!(
        state.verify_bodies.lock().clone(),
        vec![json!({ "method": "cash", "amount": "500" })]
    );
    let booking = page.find("b1").unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    let payment = booking.payment.as_ref().unwrap();
    assert_eq!(payment.method, PaymentMethod::Cash.as_str());

    // Confirmed bookings can no longer be verified
    let err = page.verify_payment("b1", "cash", "500").await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(state.verify_bodies.lock().len(), 1);
}

#[tokio::test]
async fn test_blank_amount_sends_nothing() {
    let (app, state) = logged_in().await;
    let mut page = app.bookings_page();
    page.load().await.unwrap();

    assert!(page.verify_payment("b1", "cash", "").await.is_err());
    assert!(page.verify_payment("b1", "cheque", "100").await.is_err());
    assert!(state.verify_bodies.lock().is_empty());
}

#[tokio::test]
async fn test_concurrent_page_loads_are_independent() {
    let (app, state) = logged_in().await;
    // Bookings resolve well after members
    *state.bookings_delay.lock() = Duration::from_millis(150);

    let mut bookings = app.bookings_page();
    let mut members = app.members_page();
    let (b, m) = tokio::join!(bookings.load(), members.load());
    b.unwrap();
    m.unwrap();

    assert_eq!(bookings.state.items().len(), 2);
    assert_eq!(members.state.items().len(), 3);
    assert!(bookings.state.error.is_none() && members.state.error.is_none());

    members.state.set_search("gita");
    assert_eq!(members.state.filtered().len(), 1);
    bookings.state.set_search("m-100");
    assert_eq!(bookings.state.filtered()[0].id, "b2");
}

#[tokio::test]
async fn test_booking_signals_trigger_reload() {
    let (app, state) = logged_in().await;
    let mut page = app.bookings_page();

    let created = PushEvent::decode("booking:created", json!({ "_id": "b1" })).unwrap();
    assert!(page.handle_signal(&created).await.unwrap());
    assert!(page.state.is_loaded());

    let support = PushEvent::decode("support:created", json!({ "name": "Gita" })).unwrap();
    assert!(!page.handle_signal(&support).await.unwrap());
    assert_eq!(state.seen_for("/admin/bookings").len(), 1);
}

#[tokio::test]
async fn test_dashboard_counts_and_report_export() {
    let (app, state) = logged_in().await;
    let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let mut dashboard = app.dashboard_page(today);

    dashboard.load_stats().await.unwrap();
    let stats = dashboard.stats.unwrap();
    assert_eq!((stats.products, stats.bookings, stats.members), (2, 2, 3));

    let dir = tempfile::tempdir().unwrap();
    let path = dashboard
        .export(Some(BookingStatus::Cancelled), dir.path(), today)
        .await
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "booking-report-2025-05-01.csv");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "id,status\nb1,cancelled\n"
    );

    let query = state.report_queries.lock()[0].clone();
    assert_eq!(query.get("status").map(String::as_str), Some("cancelled"));
    assert_eq!(query.get("to").map(String::as_str), Some("2025-05-01"));
    assert!(!query.contains_key("from"));
}

#[tokio::test]
async fn test_notification_refill_and_mark_read() {
    let (app, state) = logged_in().await;

    assert_eq!(app.refresh_notifications().await.unwrap(), 1);
    assert_eq!(app.notifications().len(), 2);

    assert!(app.mark_notification_read("n2").await.unwrap());
    assert_eq!(app.notifications().unread_count(), 0);

    // Already read: no request, no count change
    assert!(!app.mark_notification_read("n2").await.unwrap());
    assert!(!app.mark_notification_read("n1").await.unwrap());
    assert_eq!(state.seen_for("/admin/notifications/read").len(), 1);
    assert_eq!(app.notifications().unread_count(), 0);
}
