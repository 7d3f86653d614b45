//! In-process signal bus
//!
//! Push events are republished here so any page can react without holding a
//! reference to the push channel.

use shared::message::PushEvent;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Broadcast bus for decoded push events
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<PushEvent>,
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish to current subscribers; returns how many received it
    pub fn publish(&self, event: PushEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::message::SupportPushPayload;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let bus = SignalBus::default();
        let event = PushEvent::SupportUpdated(SupportPushPayload::from_value(serde_json::Value::Null));
        assert_eq!(bus.publish(event), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives() {
        let bus = SignalBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        let event = PushEvent::SupportUpdated(SupportPushPayload::from_value(serde_json::json!({
            "_id": "t1"
        })));
        assert_eq!(bus.publish(event.clone()), 2);
        assert_eq!(a.recv().await.unwrap(), event);
        assert_eq!(b.recv().await.unwrap(), event);
    }
}
