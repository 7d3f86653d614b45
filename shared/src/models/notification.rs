//! Admin Notification Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-app notification addressed to admins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "isRead")]
    pub read: bool,
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// Flag as read, stamping `read_at` if the server did not
    pub fn mark_read(&mut self, at: DateTime<Utc>) {
        self.read = true;
        self.read_at.get_or_insert(at);
    }
}
