//! In-process admin API used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use rental_client::{
    AdminApp, ClientConfig, MemoryAlertSink, PushConnector, PushDispatcher, TokenStorage,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One request as the server saw it
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
pub struct MockState {
    pub seen: Mutex<Vec<Seen>>,
    pub logins: AtomicUsize,
    pub bookings: Mutex<Vec<Value>>,
    pub members: Mutex<Vec<Value>>,
    pub cancel_calls: AtomicUsize,
    pub verify_bodies: Mutex<Vec<Value>>,
    pub report_queries: Mutex<Vec<HashMap<String, String>>>,
    /// Accept cancels without changing the booking
    pub ignore_cancel: Mutex<bool>,
    pub bookings_delay: Mutex<Duration>,
}

impl MockState {
    pub fn seen_for(&self, path: &str) -> Vec<Seen> {
        self.seen
            .lock()
            .iter()
            .filter(|s| s.path == path)
            .cloned()
            .collect()
    }
}

type Shared = Arc<MockState>;

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Record the request; reject it unless it carries a bearer
fn guard(state: &MockState, path: &str, headers: &HeaderMap) -> Result<(), Response> {
    let authorization = header_str(headers, header::AUTHORIZATION);
    state.seen.lock().push(Seen {
        path: path.to_string(),
        authorization: authorization.clone(),
        content_type: header_str(headers, header::CONTENT_TYPE),
    });
    match authorization {
        Some(value) if value.starts_with("Bearer tok-") => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, Json(json!({ "message": "No token" }))).into_response()),
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match (username, password) {
        ("admin", "secret") => {
            let n = state.logins.fetch_add(1, Ordering::SeqCst) + 1;
            Json(json!({
                "token": format!("tok-{n}"),
                "admin": { "_id": "a1", "username": "admin", "name": "Site Admin" }
            }))
            .into_response()
        }
        ("silent", _) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn list_bookings(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejected) = guard(&state, "/admin/bookings", &headers) {
        return rejected;
    }
    let delay = *state.bookings_delay.lock();
    tokio::time::sleep(delay).await;
    let bookings = state.bookings.lock().clone();
    Json(json!({ "bookings": bookings })).into_response()
}

async fn cancel_booking(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = guard(&state, "/admin/bookings/cancel", &headers) {
        return rejected;
    }
    state.cancel_calls.fetch_add(1, Ordering::SeqCst);
    if !*state.ignore_cancel.lock() {
        for booking in state.bookings.lock().iter_mut() {
            if booking["_id"] == id.as_str() {
                booking["status"] = json!("cancelled");
                booking["adminNotes"] = body["reason"].clone();
            }
        }
    }
    Json(json!({ "message": "Booking cancelled" })).into_response()
}

async fn verify_payment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejected) = guard(&state, "/admin/bookings/verify-payment", &headers) {
        return rejected;
    }
    state.verify_bodies.lock().push(body.clone());
    for booking in state.bookings.lock().iter_mut() {
        if booking["_id"] == id.as_str() {
            booking["status"] = json!("confirmed");
            booking["payment"] = body.clone();
        }
    }
    Json(json!({ "message": "Payment verified" })).into_response()
}

async fn list_members(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejected) = guard(&state, "/admin/members", &headers) {
        return rejected;
    }
    Json(Value::Array(state.members.lock().clone())).into_response()
}

async fn list_products(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejected) = guard(&state, "/products", &headers) {
        return rejected;
    }
    Json(json!([
        { "_id": "p1", "name": "Kayak", "productId": "KAYAK-01", "basePrice": 1200 },
        { "_id": "p2", "name": "Tent", "productId": "TENT-02", "basePrice": "800.50" }
    ]))
    .into_response()
}

async fn create_product(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    if let Err(rejected) = guard(&state, "/admin/products", &headers) {
        return rejected;
    }
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"name\"") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "name missing" }))).into_response();
    }
    (StatusCode::CREATED, Json(json!({ "message": "Product created" }))).into_response()
}

async fn list_notifications(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejected) = guard(&state, "/admin/notifications", &headers) {
        return rejected;
    }
    Json(json!({ "notifications": [
        { "_id": "n2", "title": "Support", "message": "New ticket", "read": false },
        { "_id": "n1", "title": "Booking", "message": "New booking", "isRead": true }
    ]}))
    .into_response()
}

async fn mark_read(State(state): State<Shared>, Path(_id): Path<String>, headers: HeaderMap) -> Response {
    if let Err(rejected) = guard(&state, "/admin/notifications/read", &headers) {
        return rejected;
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn report(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = guard(&state, "/admin/reports/bookings.csv", &headers) {
        return rejected;
    }
    state.report_queries.lock().push(query);
    (
        [(header::CONTENT_TYPE, "text/csv")],
        "id,status\nb1,cancelled\n",
    )
        .into_response()
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/admin/auth/login", post(login))
        .route("/api/admin/bookings", get(list_bookings))
        .route("/api/admin/bookings/{id}/cancel", post(cancel_booking))
        .route("/api/admin/bookings/{id}/verify-payment", post(verify_payment))
        .route("/api/admin/members", get(list_members))
        .route("/api/products", get(list_products))
        .route("/api/admin/products", post(create_product))
        .route("/api/admin/notifications", get(list_notifications))
        .route("/api/admin/notifications/{id}/read", patch(mark_read))
        .route("/api/admin/reports/bookings.csv", get(report))
        .with_state(state)
}

/// Serve `router` on an ephemeral port; returns the origin (`http://127.0.0.1:port`)
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn sample_bookings() -> Vec<Value> {
    vec![
        json!({
            "_id": "b1",
            "userName": "Asha Gurung",
            "userPhone": "9800000001",
            "productId": "KAYAK-01",
            "quantity": 1,
            "startDateTime": "2025-05-01T04:15:00Z",
            "endDateTime": "2025-05-01T06:15:00Z",
            "totalAmount": 2400,
            "status": "pending"
        }),
        json!({
            "_id": "b2",
            "userName": "Bikash Rai",
            "memberId": "M-100",
            "productId": "TENT-02",
            "status": "confirmed",
            "payment": { "method": "esewa", "amount": 800 }
        }),
    ]
}

pub fn sample_members() -> Vec<Value> {
    vec![
        json!({ "_id": "m1", "memberId": "M-100", "name": "Bikash Rai", "status": "active", "discountPercent": 10 }),
        json!({ "_id": "m2", "memberId": "M-101", "name": "Gita Shah", "status": "expired" }),
        json!({ "_id": "m3", "memberId": "M-102", "name": "Hari Lama", "status": "suspended" }),
    ]
}

/// Mock API with sample data; returns the API base (`.../api`) and the state
pub async fn spawn_api() -> (String, Shared) {
    let state = Arc::new(MockState::default());
    *state.bookings.lock() = sample_bookings();
    *state.members.lock() = sample_members();
    let origin = serve(router(state.clone())).await;
    (format!("{origin}/api"), state)
}

/// Connector that holds a subscription open without any network
#[derive(Default)]
pub struct IdleConnector {
    pub opened: AtomicUsize,
}

#[async_trait]
impl PushConnector for IdleConnector {
    async fn serve(&self, _token: String, _dispatcher: Arc<PushDispatcher>, shutdown: CancellationToken) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        shutdown.cancelled().await;
    }
}

/// App wired to the mock API with in-memory alerts and an idle push connector
pub fn app_for(api_base: &str, storage: Arc<dyn TokenStorage>) -> (AdminApp, Arc<MemoryAlertSink>) {
    let sink = Arc::new(MemoryAlertSink::new());
    let app = AdminApp::init(
        ClientConfig::new(api_base),
        storage,
        sink.clone(),
        Arc::new(IdleConnector::default()),
    )
    .unwrap();
    (app, sink)
}
