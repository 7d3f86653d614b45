//! Data models
//!
//! Remote records as the admin API returns them. The console never owns
//! authoritative state, these are cached views.
//! All IDs are the API's opaque string ids (`_id` on the wire).

pub mod analytics;
pub mod booking;
pub mod category;
pub mod member;
pub mod notification;
pub mod product;
pub mod support;

// Re-exports
pub use analytics::*;
pub use booking::*;
pub use category::*;
pub use member::*;
pub use notification::*;
pub use product::*;
pub use support::*;
