//! Support Ticket Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TicketStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "resolved")]
    Resolved,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::Resolved => write!(f, "resolved"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown ticket status: {other}")),
        }
    }
}

/// Support ticket raised by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default)]
    pub status: TicketStatus,
    #[serde(default)]
    pub admin_message: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `PUT /admin/support/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdate {
    pub status: TicketStatus,
    pub admin_message: String,
}

impl From<&SupportTicket> for TicketUpdate {
    /// Update form prefilled with the ticket's current reply
    fn from(t: &SupportTicket) -> Self {
        Self {
            status: t.status,
            admin_message: t.admin_message.clone().unwrap_or_default(),
        }
    }
}
