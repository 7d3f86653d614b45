//! Rental Client - session, push notifications and admin API for the rental console
//!
//! [`AdminApp`] is the entry point: it restores the session, keeps the push
//! channel in step with the session token and hands out page controllers.

pub mod alert;
pub mod api;
pub mod app;
pub mod bus;
pub mod config;
pub mod error;
pub mod http;
pub mod notification;
pub mod pages;
pub mod push;
pub mod router;
pub mod session;
pub mod storage;

pub use alert::{AlertSink, Alerts, MemoryAlertSink, TerminalAlertSink, Toast, ToastLevel};
pub use api::{AdminApi, ImageUpload};
pub use app::AdminApp;
pub use bus::SignalBus;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::AuthClient;
pub use notification::NotificationStore;
pub use push::{ChannelState, PushChannel, PushConnector, PushDispatcher, SocketIoConnector};
pub use router::{Route, RouteDecision, RouteGuard};
pub use session::{LoginOutcome, SessionStore};
pub use storage::{FileTokenStorage, MemoryTokenStorage, TokenStorage};

// Re-export shared types for convenience
pub use shared::client::{AdminInfo, LoginResponse};
pub use shared::message::PushEvent;
