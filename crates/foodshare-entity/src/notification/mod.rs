//! Notification domain entities.

pub mod event_type;
pub mod model;
pub mod target;

pub use event_type::{NotificationContent, NotificationEventType};
pub use model::{NotificationKey, NotificationRecord};
pub use target::NotificationTarget;
