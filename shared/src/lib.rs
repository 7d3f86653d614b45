//! Shared types for the rental admin console
//!
//! Wire models, auth DTOs, list-envelope decoding and the push event set.
//! These types are shared between rental-client and rental-admin.

pub mod client;
pub mod message;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Push event re-exports (for convenient access)
pub use message::{PushEvent, PushEventKind};
