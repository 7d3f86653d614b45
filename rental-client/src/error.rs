//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error payload
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication required or token rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected before or by the server as invalid input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Token storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Push channel failure (socket or frame)
    #[error("Push channel error: {0}")]
    Push(String),

    /// Operation needs a session token and none is present
    #[error("Not authenticated")]
    NotAuthenticated,
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Push(err.to_string())
    }
}

impl ClientError {
    /// Text shown in a page's inline error banner
    pub fn banner(&self) -> String {
        match self {
            ClientError::Api { message, .. } => message.clone(),
            ClientError::NotFound(msg) | ClientError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
