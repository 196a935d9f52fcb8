//! Per-NGO visibility of pending donations.

pub mod service;

pub use service::{VisibilityService, order_newest_first};
