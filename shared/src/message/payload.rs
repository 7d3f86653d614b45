use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Notification;

// ==================== Helpers ====================

/// The server sends either the record itself or `{ <key>: record }`.
fn unwrap_record<'a>(value: &'a Value, key: &str) -> &'a Value {
    match value.get(key) {
        Some(inner) if inner.is_object() => inner,
        _ => value,
    }
}

fn str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| value.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ==================== Payloads ====================

/// 预订事件载荷 (booking:created / booking:updated)
///
/// Keeps the raw record so that subscribers can use fields the console does
/// not model.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingPushPayload {
    pub booking_id: Option<String>,
    pub user_name: Option<String>,
    pub raw: Value,
}

impl BookingPushPayload {
    pub fn from_value(raw: Value) -> Self {
        let record = unwrap_record(&raw, "booking");
        Self {
            booking_id: str_field(record, &["_id", "id", "bookingId"]),
            user_name: str_field(record, &["userName", "name"]),
            raw,
        }
    }

    /// What the toast calls the booking
    pub fn identity(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.booking_id.as_deref())
            .unwrap_or("unknown booking")
    }
}

/// 工单事件载荷 (support:created / support:updated)
#[derive(Debug, Clone, PartialEq)]
pub struct SupportPushPayload {
    pub ticket_id: Option<String>,
    pub requester: Option<String>,
    pub raw: Value,
}

impl SupportPushPayload {
    pub fn from_value(raw: Value) -> Self {
        let record = unwrap_record(&raw, "ticket");
        Self {
            ticket_id: str_field(record, &["_id", "id", "ticketId"]),
            requester: str_field(record, &["name", "userName"]),
            raw,
        }
    }

    pub fn requester_name(&self) -> &str {
        self.requester.as_deref().unwrap_or("a customer")
    }
}

/// 管理员通知载荷 (admin:*-notification)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdminNotificationPayload {
    pub message: String,
    /// Attached record; `None` when absent or unreadable
    pub notification: Option<Notification>,
}

impl AdminNotificationPayload {
    /// Never fails: a malformed attached record is dropped, the event is kept
    pub fn from_value(raw: Value) -> Self {
        let message = raw
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let notification = match raw.get("notification") {
            None | Some(Value::Null) => None,
            Some(record) => match Notification::deserialize(record) {
                Ok(notification) => Some(notification),
                Err(e) => {
                    tracing::warn!("Ignoring malformed notification record: {e}");
                    None
                }
            },
        };

        Self {
            message,
            notification,
        }
    }

    /// Toast text, the server message or the attached record's title
    pub fn headline(&self) -> &str {
        if !self.message.is_empty() {
            return &self.message;
        }
        self.notification
            .as_ref()
            .map(|n| n.title.as_str())
            .filter(|t| !t.is_empty())
            .unwrap_or("New notification")
    }
}
