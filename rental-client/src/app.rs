//! Application context
//!
//! One `AdminApp` per process, built at startup and handed to pages. It owns
//! the session, the request client, the notification window, the signal bus
//! and the push channel, and makes their lifecycle explicit:
//! `init` -> `start` -> (`login` / `logout`)* -> `shutdown`.

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::alert::{AlertSink, Alerts, TerminalAlertSink};
use crate::api::AdminApi;
use crate::bus::SignalBus;
use crate::http::AuthClient;
use crate::notification::NotificationStore;
use crate::pages::{
    AddProductPage, BookingsPage, CategoriesPage, DashboardPage, MembersPage, ProductsPage,
    SupportPage,
};
use crate::push::{PushChannel, PushConnector, PushDispatcher, SocketIoConnector};
use crate::router::{Route, RouteDecision, RouteGuard};
use crate::session::{LoginOutcome, SessionStore};
use crate::storage::{FileTokenStorage, TokenStorage};
use crate::{ClientConfig, ClientResult};

pub struct AdminApp {
    config: ClientConfig,
    session: Arc<SessionStore>,
    api: AdminApi,
    notifications: Arc<NotificationStore>,
    bus: SignalBus,
    alerts: Alerts,
    channel: Arc<PushChannel>,
    shutdown: CancellationToken,
    follower: Mutex<Option<JoinHandle<()>>>,
}

impl AdminApp {
    /// Wire the context from explicit collaborators and restore the session
    pub fn init(
        config: ClientConfig,
        storage: Arc<dyn TokenStorage>,
        sink: Arc<dyn AlertSink>,
        connector: Arc<dyn PushConnector>,
    ) -> ClientResult<Self> {
        let session = Arc::new(SessionStore::new(storage));
        session.restore()?;

        let http = AuthClient::new(&config, session.subscribe())?;
        let notifications = Arc::new(NotificationStore::new(config.notification_cap));
        let bus = SignalBus::default();
        let alerts = Alerts::new(sink);
        let dispatcher = Arc::new(PushDispatcher::new(
            alerts.clone(),
            notifications.clone(),
            bus.clone(),
        ));

        Ok(Self {
            channel: Arc::new(PushChannel::new(connector, dispatcher)),
            api: AdminApi::new(http),
            config,
            session,
            notifications,
            bus,
            alerts,
            shutdown: CancellationToken::new(),
            follower: Mutex::new(None),
        })
    }

    /// Production wiring: token file, terminal alerts, Socket.IO transport
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let storage = Arc::new(FileTokenStorage::new(config.token_path.clone()));
        let connector = Arc::new(SocketIoConnector::new(config.push_url.clone()));
        Self::init(config, storage, Arc::new(TerminalAlertSink), connector)
    }

    /// Let the push channel follow the session token
    pub fn start(&self) {
        let mut follower = self.follower.lock();
        if follower.is_some() {
            return;
        }
        *follower = Some(
            self.channel
                .clone()
                .follow(self.session.subscribe(), self.shutdown.child_token()),
        );
    }

    /// Close the push channel and stop following the session
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let follower = self.follower.lock().take();
        if let Some(task) = follower
            && let Err(e) = task.await
        {
            tracing::warn!("Push follower task failed: {e}");
        }
        self.channel.close().await;
    }

    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        self.session.login(self.api.http(), username, password).await
    }

    /// Clear the session and close the channel; the console goes to login
    pub async fn logout(&self) -> ClientResult<Route> {
        let cleared = self.session.logout();
        self.channel.close().await;
        cleared?;
        Ok(Route::Login)
    }

    /// Guarded route for a path
    pub fn route(&self, path: &str) -> RouteDecision {
        RouteGuard::resolve_path(path, &self.session)
    }

    // ========== Notifications ==========

    /// Refill the window from the server; returns the unread count
    pub async fn refresh_notifications(&self) -> ClientResult<usize> {
        let list = self.api.list_notifications().await?;
        self.notifications.replace(list);
        Ok(self.notifications.unread_count())
    }

    /// Mark one notification read. Already-read entries return `false`
    /// without a request.
    pub async fn mark_notification_read(&self, id: &str) -> ClientResult<bool> {
        if self.notifications.is_read(id) == Some(true) {
            return Ok(false);
        }
        self.api.mark_notification_read(id).await?;
        self.notifications.mark_read(id, Utc::now());
        Ok(true)
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<()> {
        self.api.mark_all_notifications_read().await?;
        self.notifications.mark_all_read(Utc::now());
        Ok(())
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &AdminApi {
        &self.api
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn bus(&self) -> &SignalBus {
        &self.bus
    }

    pub fn alerts(&self) -> &Alerts {
        &self.alerts
    }

    pub fn channel(&self) -> &PushChannel {
        &self.channel
    }

    // ========== Pages ==========

    pub fn dashboard_page(&self, today: NaiveDate) -> DashboardPage {
        DashboardPage::new(self.api.clone(), today)
    }

    pub fn products_page(&self) -> ProductsPage {
        ProductsPage::new(self.api.clone())
    }

    pub fn add_product_page(&self) -> AddProductPage {
        AddProductPage::new(self.api.clone())
    }

    pub fn members_page(&self) -> MembersPage {
        MembersPage::new(self.api.clone())
    }

    pub fn bookings_page(&self) -> BookingsPage {
        BookingsPage::new(self.api.clone())
    }

    pub fn support_page(&self) -> SupportPage {
        SupportPage::new(self.api.clone())
    }

    pub fn categories_page(&self) -> CategoriesPage {
        CategoriesPage::new(self.api.clone())
    }
}
