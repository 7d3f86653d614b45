//! Push event definitions
//!
//! The server pushes a fixed set of named events over the notification
//! channel. They are decoded once, at the edge, into the closed `PushEvent`
//! union so every consumer matches exhaustively instead of comparing names.

use serde_json::Value;
use std::fmt;

pub mod payload;
pub use payload::*;

/// Named events carried by the push channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PushEventKind {
    BookingCreated,
    BookingUpdated,
    AdminBookingNotification,
    SupportCreated,
    SupportUpdated,
    AdminSupportNotification,
}

impl PushEventKind {
    pub const ALL: [PushEventKind; 6] = [
        PushEventKind::BookingCreated,
        PushEventKind::BookingUpdated,
        PushEventKind::AdminBookingNotification,
        PushEventKind::SupportCreated,
        PushEventKind::SupportUpdated,
        PushEventKind::AdminSupportNotification,
    ];

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::BookingCreated => "booking:created",
            Self::BookingUpdated => "booking:updated",
            Self::AdminBookingNotification => "admin:booking-notification",
            Self::SupportCreated => "support:created",
            Self::SupportUpdated => "support:updated",
            Self::AdminSupportNotification => "admin:support-notification",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

impl fmt::Display for PushEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which area an admin notification belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationScope {
    Booking,
    Support,
}

/// Decoded push event (also the payload of the in-process signal bus)
#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    BookingCreated(BookingPushPayload),
    BookingUpdated(BookingPushPayload),
    SupportCreated(SupportPushPayload),
    SupportUpdated(SupportPushPayload),
    AdminNotification {
        scope: NotificationScope,
        payload: AdminNotificationPayload,
    },
}

impl PushEvent {
    /// Decode a named event. Unknown names yield `None`.
    pub fn decode(name: &str, payload: Value) -> Option<Self> {
        let kind = PushEventKind::from_name(name)?;

        let event = match kind {
            PushEventKind::BookingCreated => {
                Self::BookingCreated(BookingPushPayload::from_value(payload))
            }
            PushEventKind::BookingUpdated => {
                Self::BookingUpdated(BookingPushPayload::from_value(payload))
            }
            PushEventKind::SupportCreated => {
                Self::SupportCreated(SupportPushPayload::from_value(payload))
            }
            PushEventKind::SupportUpdated => {
                Self::SupportUpdated(SupportPushPayload::from_value(payload))
            }
            PushEventKind::AdminBookingNotification => Self::AdminNotification {
                scope: NotificationScope::Booking,
                payload: AdminNotificationPayload::from_value(payload),
            },
            PushEventKind::AdminSupportNotification => Self::AdminNotification {
                scope: NotificationScope::Support,
                payload: AdminNotificationPayload::from_value(payload),
            },
        };
        Some(event)
    }

    pub fn kind(&self) -> PushEventKind {
        match self {
            Self::BookingCreated(_) => PushEventKind::BookingCreated,
            Self::BookingUpdated(_) => PushEventKind::BookingUpdated,
            Self::SupportCreated(_) => PushEventKind::SupportCreated,
            Self::SupportUpdated(_) => PushEventKind::SupportUpdated,
            Self::AdminNotification {
                scope: NotificationScope::Booking,
                ..
            } => PushEventKind::AdminBookingNotification,
            Self::AdminNotification {
                scope: NotificationScope::Support,
                ..
            } => PushEventKind::AdminSupportNotification,
        }
    }

    /// Booking list views refetch on these
    pub fn touches_bookings(&self) -> bool {
        matches!(
            self,
            Self::BookingCreated(_)
                | Self::BookingUpdated(_)
                | Self::AdminNotification {
                    scope: NotificationScope::Booking,
                    ..
                }
        )
    }

    /// Support list views refetch on these
    pub fn touches_support(&self) -> bool {
        matches!(
            self,
            Self::SupportCreated(_)
                | Self::SupportUpdated(_)
                | Self::AdminNotification {
                    scope: NotificationScope::Support,
                    ..
                }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_names_round_trip() {
        for kind in PushEventKind::ALL {
            assert_eq!(PushEventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PushEventKind::from_name("order:created"), None);
    }

    #[test]
    fn test_decode_unknown_event() {
        assert_eq!(PushEvent::decode("ping", json!({})), None);
    }

    #[test]
    fn test_decode_admin_notification() {
        let event = PushEvent::decode(
            "admin:support-notification",
            json!({
                "message": "New ticket from Gita",
                "notification": { "_id": "n1", "title": "Support", "message": "New ticket" }
            }),
        )
        .unwrap();

        assert_eq!(event.kind(), PushEventKind::AdminSupportNotification);
        assert!(event.touches_support());
        assert!(!event.touches_bookings());
        match event {
            PushEvent::AdminNotification { payload, .. } => {
                assert_eq!(payload.message, "New ticket from Gita");
                assert_eq!(payload.notification.unwrap().id, "n1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
