//! Notification fan-out and the per-viewer inbox.

pub mod inbox;
pub mod service;

pub use inbox::{InboxService, merge_inbox};
pub use service::NotificationService;
