//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

/// Default API base used by a local development server
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
/// Token file used when none is configured
pub const DEFAULT_TOKEN_FILE: &str = ".rental-admin/session.json";
/// Maximum number of notifications kept in memory
pub const DEFAULT_NOTIFICATION_CAP: usize = 100;

/// Console client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:5000/api")
    pub api_base_url: String,

    /// Push endpoint origin (e.g., "http://localhost:5000")
    pub push_url: String,

    /// File holding the persisted session token
    pub token_path: PathBuf,

    /// Request timeout; none by default
    pub timeout: Option<Duration>,

    /// Notification window size
    pub notification_cap: usize,
}

impl ClientConfig {
    /// Create a configuration for an API base, deriving the push origin
    pub fn new(api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into();
        Self {
            push_url: derive_push_url(&api_base_url),
            api_base_url,
            token_path: PathBuf::from(DEFAULT_TOKEN_FILE),
            timeout: None,
            notification_cap: DEFAULT_NOTIFICATION_CAP,
        }
    }

    /// Load from `RENTAL_*` environment variables
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | RENTAL_API_URL | http://localhost:5000/api |
    /// | RENTAL_PUSH_URL | API URL without `/api` |
    /// | RENTAL_TOKEN_PATH | .rental-admin/session.json |
    /// | RENTAL_REQUEST_TIMEOUT_SECS | (none) |
    pub fn from_env() -> Self {
        let api = std::env::var("RENTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut config = Self::new(api);

        if let Ok(push) = std::env::var("RENTAL_PUSH_URL") {
            config = config.with_push_url(push);
        }
        if let Ok(path) = std::env::var("RENTAL_TOKEN_PATH") {
            config = config.with_token_path(path);
        }
        if let Some(secs) = std::env::var("RENTAL_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }

    /// Override the push origin
    pub fn with_push_url(mut self, url: impl Into<String>) -> Self {
        self.push_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the token file
    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the notification window size
    pub fn with_notification_cap(mut self, cap: usize) -> Self {
        self.notification_cap = cap;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

/// Push origin for an API base: trailing `/` and a final `/api` are stripped
pub fn derive_push_url(api_base_url: &str) -> String {
    let trimmed = api_base_url.trim_end_matches('/');
    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .trim_end_matches('/')
        .to_string()
}
