//! Session store
//!
//! Owns the bearer token and the authenticated admin. The token lives in a
//! `watch` channel: the request client and the push channel follow it, so a
//! login or logout is visible to both before the next call.

use parking_lot::RwLock;
use shared::client::{AdminInfo, LoginRequest};
use std::sync::Arc;
use tokio::sync::watch;

use crate::http::AuthClient;
use crate::storage::TokenStorage;
use crate::{ClientError, ClientResult};

/// Fallback text when neither the server nor the transport says anything
pub const LOGIN_FAILED: &str = "Login failed";

/// Result of a login attempt; failures are reported here, never thrown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl LoginOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Process-wide session state
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    token_tx: watch::Sender<Option<String>>,
    admin: RwLock<Option<AdminInfo>>,
}

impl SessionStore {
    /// Empty session over the given storage; call [`restore`](Self::restore) to load
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let (token_tx, _) = watch::channel(None);
        Self {
            storage,
            token_tx,
            admin: RwLock::new(None),
        }
    }

    /// Load the persisted token, if any
    pub fn restore(&self) -> ClientResult<bool> {
        let token = self.storage.load()?;
        let restored = token.is_some();
        if restored {
            tracing::info!("Restored session token from storage");
        }
        self.token_tx.send_replace(token);
        Ok(restored)
    }

    /// Current token
    pub fn token(&self) -> Option<String> {
        self.token_tx.borrow().clone()
    }

    /// True iff a token is present right now
    pub fn is_authenticated(&self) -> bool {
        self.token_tx.borrow().is_some()
    }

    pub fn admin(&self) -> Option<AdminInfo> {
        self.admin.read().clone()
    }

    /// Follow token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    /// Authenticate against the API
    ///
    /// A success response without any token still reports success but leaves
    /// the session unauthenticated.
    pub async fn login(&self, client: &AuthClient, username: &str, password: &str) -> LoginOutcome {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = match client.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username, "Login failed: {e}");
                return LoginOutcome::failed(failure_message(e));
            }
        };

        let Some(token) = response.bearer_token().map(str::to_string) else {
            tracing::warn!(username, "Login response carried no token");
            return LoginOutcome::ok();
        };

        if let Err(e) = self.storage.save(&token) {
            tracing::warn!("Failed to persist session token: {e}");
        }
        let admin = response.into_admin();
        tracing::info!(
            admin = admin.as_ref().map(AdminInfo::display_name).unwrap_or(username),
            "Admin logged in"
        );
        *self.admin.write() = admin;
        self.token_tx.send_replace(Some(token));
        LoginOutcome::ok()
    }

    /// Drop the session: memory first, then durable storage
    pub fn logout(&self) -> ClientResult<()> {
        self.admin.write().take();
        let had_token = self.token_tx.send_replace(None).is_some();
        if had_token {
            tracing::info!("Admin logged out");
        }
        self.storage.clear()
    }
}

fn failure_message(err: ClientError) -> String {
    match err {
        ClientError::Api { message, .. } if !message.is_empty() => message,
        ClientError::Http(e) => e.to_string(),
        _ => LOGIN_FAILED.to_string(),
    }
}
