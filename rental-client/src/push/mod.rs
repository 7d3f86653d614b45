//! Push notification channel
//!
//! One subscription per authenticated session. The channel follows the
//! session token: a token opens it, a different token tears the old
//! subscription down before opening the new one, no token closes it.
//!
//! Decoded events go through [`PushDispatcher`], which plays the alert,
//! updates the notification window and republishes on the signal bus.

pub mod codec;
pub mod transport;

use async_trait::async_trait;
use shared::message::PushEvent;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::alert::{Alerts, Toast};
use crate::bus::SignalBus;
use crate::notification::NotificationStore;

pub use transport::SocketIoConnector;

/// Channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
}

/// Opens subscriptions for the channel
#[async_trait]
pub trait PushConnector: Send + Sync + 'static {
    /// Serve one subscription until `shutdown` fires, handing every decoded
    /// event to `dispatcher`.
    async fn serve(&self, token: String, dispatcher: Arc<PushDispatcher>, shutdown: CancellationToken);
}

/// Applies the side effects of a push event
pub struct PushDispatcher {
    alerts: Alerts,
    notifications: Arc<NotificationStore>,
    bus: SignalBus,
}

impl PushDispatcher {
    pub fn new(alerts: Alerts, notifications: Arc<NotificationStore>, bus: SignalBus) -> Self {
        Self {
            alerts,
            notifications,
            bus,
        }
    }

    /// Alert, record, republish
    pub fn dispatch(&self, event: PushEvent) {
        tracing::debug!(event = %event.kind(), "Push event received");

        let toast = match &event {
            PushEvent::BookingCreated(p) => Toast::info(format!("New booking: {}", p.identity())),
            PushEvent::BookingUpdated(p) => Toast::info(format!("Booking updated: {}", p.identity())),
            PushEvent::SupportCreated(p) => {
                Toast::info(format!("New support ticket from {}", p.requester_name()))
            }
            PushEvent::SupportUpdated(_) => Toast::success("Support ticket updated"),
            PushEvent::AdminNotification { payload, .. } => {
                if let Some(notification) = &payload.notification {
                    self.notifications.push(notification.clone());
                }
                Toast::info(payload.headline())
            }
        };

        self.alerts.notify(&toast);
        self.bus.publish(event);
    }
}

struct Subscription {
    token: String,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

/// The push channel state machine
pub struct PushChannel {
    connector: Arc<dyn PushConnector>,
    dispatcher: Arc<PushDispatcher>,
    active: Mutex<Option<Subscription>>,
}

impl PushChannel {
    pub fn new(connector: Arc<dyn PushConnector>, dispatcher: Arc<PushDispatcher>) -> Self {
        Self {
            connector,
            dispatcher,
            active: Mutex::new(None),
        }
    }

    /// A subscription whose connector gave up counts as disconnected
    pub async fn state(&self) -> ChannelState {
        match self.active.lock().await.as_ref() {
            Some(sub) if !sub.task.is_finished() => ChannelState::Connected,
            _ => ChannelState::Disconnected,
        }
    }

    /// Bring the channel in line with the session token
    pub async fn sync_token(&self, token: Option<String>) {
        let mut active = self.active.lock().await;

        if let (Some(current), Some(next)) = (active.as_ref(), token.as_deref())
            && current.token == next
        {
            return;
        }

        if let Some(previous) = active.take() {
            previous.shutdown.cancel();
            if let Err(e) = previous.task.await {
                tracing::warn!("Push subscription task failed: {e}");
            }
            tracing::info!("Push channel closed");
        }

        if let Some(token) = token {
            let shutdown = CancellationToken::new();
            let connector = self.connector.clone();
            let dispatcher = self.dispatcher.clone();
            let task = tokio::spawn({
                let token = token.clone();
                let shutdown = shutdown.clone();
                async move { connector.serve(token, dispatcher, shutdown).await }
            });
            tracing::info!("Push channel opened");
            *active = Some(Subscription {
                token,
                shutdown,
                task,
            });
        }
    }

    /// Release the subscription
    pub async fn close(&self) {
        self.sync_token(None).await;
    }

    /// Drive the channel from a token watch until `shutdown`, then close
    pub fn follow(
        self: Arc<Self>,
        mut tokens: watch::Receiver<Option<String>>,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let initial = tokens.borrow_and_update().clone();
            self.sync_token(initial).await;

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    changed = tokens.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let token = tokens.borrow_and_update().clone();
                        self.sync_token(token).await;
                    }
                }
            }

            self.close().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::MemoryAlertSink;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts live subscriptions and replays scripted events on open
    #[derive(Default)]
    struct ScriptedConnector {
        opened: AtomicUsize,
        live: Arc<AtomicUsize>,
        tokens: parking_lot::Mutex<Vec<String>>,
        script: Vec<PushEvent>,
    }

    #[async_trait]
    impl PushConnector for ScriptedConnector {
        async fn serve(&self, token: String, dispatcher: Arc<PushDispatcher>, shutdown: CancellationToken) {
            self.opened.fetch_add(1, Ordering::SeqCst);
            self.live.fetch_add(1, Ordering::SeqCst);
            self.tokens.lock().push(token);
            for event in &self.script {
                dispatcher.dispatch(event.clone());
            }
            shutdown.cancelled().await;
            self.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn dispatcher(sink: Arc<MemoryAlertSink>) -> (Arc<PushDispatcher>, Arc<NotificationStore>, SignalBus) {
        let store = Arc::new(NotificationStore::default());
        let bus = SignalBus::default();
        let dispatcher = Arc::new(PushDispatcher::new(Alerts::new(sink), store.clone(), bus.clone()));
        (dispatcher, store, bus)
    }

    fn admin_event(id: &str) -> PushEvent {
        PushEvent::decode(
            "admin:booking-notification",
            json!({ "message": "Booking confirmed", "notification": { "_id": id, "title": "Booking" } }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_effects() {
        let sink = Arc::new(MemoryAlertSink::blocking_tones());
        let (dispatcher, store, bus) = dispatcher(sink.clone());
        let mut rx = bus.subscribe();

        let created = PushEvent::decode("booking:created", json!({ "userName": "Asha" })).unwrap();
        dispatcher.dispatch(created.clone());
        dispatcher.dispatch(admin_event("n1"));
        let updated = PushEvent::decode("support:updated", json!({})).unwrap();
        dispatcher.dispatch(updated);

        let toasts = sink.toasts();
        assert_eq!(toasts.len(), 3);
        assert_eq!(toasts[0], Toast::info("New booking: Asha"));
        assert_eq!(toasts[1], Toast::info("Booking confirmed"));
        assert_eq!(toasts[2], Toast::success("Support ticket updated"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.unread_count(), 1);
        assert_eq!(rx.recv().await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_admin_event_with_unreadable_record_still_alerts() {
        let sink = Arc::new(MemoryAlertSink::new());
        let (dispatcher, store, bus) = dispatcher(sink.clone());
        let mut rx = bus.subscribe();

        let event = PushEvent::decode(
            "admin:booking-notification",
            json!({ "message": "Booking confirmed", "notification": { "title": "Booking", "message": "x" } }),
        )
        .unwrap();
        assert!(event.touches_bookings());
        dispatcher.dispatch(event.clone());

        assert_eq!(sink.tones(), 1);
        assert_eq!(sink.toasts(), vec![Toast::info("Booking confirmed")]);
        assert!(store.is_empty());
        assert_eq!(store.unread_count(), 0);
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_token_changes_replace_subscription() {
        let sink = Arc::new(MemoryAlertSink::new());
        let (dispatcher, _, _) = dispatcher(sink);
        let connector = Arc::new(ScriptedConnector::default());
        let channel = PushChannel::new(connector.clone(), dispatcher);

        assert_eq!(channel.state().await, ChannelState::Disconnected);
        channel.sync_token(Some("a".into())).await;
        assert_eq!(channel.state().await, ChannelState::Connected);

        // Same token: no reconnect
        channel.sync_token(Some("a".into())).await;
        channel.sync_token(Some("b".into())).await;
        tokio::task::yield_now().await;

        channel.close().await;
        assert_eq!(channel.state().await, ChannelState::Disconnected);
        assert_eq!(connector.live.load(Ordering::SeqCst), 0);
        assert_eq!(*connector.tokens.lock(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_follow_session_token() {
        let sink = Arc::new(MemoryAlertSink::new());
        let (dispatcher, store, _) = dispatcher(sink.clone());
        let connector = Arc::new(ScriptedConnector {
            script: vec![admin_event("n1")],
            ..Default::default()
        });
        let channel = Arc::new(PushChannel::new(connector.clone(), dispatcher));

        let (token_tx, token_rx) = watch::channel(None);
        let shutdown = CancellationToken::new();
        let task = channel.clone().follow(token_rx, shutdown.clone());

        token_tx.send_replace(Some("t1".to_string()));
        for _ in 0..50 {
            if store.len() == 1 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(store.len(), 1);
        assert_eq!(sink.toasts().len(), 1);

        token_tx.send_replace(None);
        shutdown.cancel();
        task.await.unwrap();

        assert_eq!(channel.state().await, ChannelState::Disconnected);
        assert_eq!(connector.live.load(Ordering::SeqCst), 0);
        assert_eq!(connector.opened.load(Ordering::SeqCst), 1);
    }
}
