//! Domain events emitted by FoodShare operations.
//!
//! Events are published on the lifecycle engine's event channel and attached
//! to audit log entries.

pub mod donation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{EventId, UserId};

pub use donation::DonationEvent;

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: EventId,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The user who caused the event (if applicable).
    pub actor_id: Option<UserId>,
    /// The event payload.
    pub payload: DonationEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<UserId>, payload: DonationEvent) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }

    /// Short machine name of the payload, used as the audit action.
    pub fn action(&self) -> &'static str {
        self.payload.action()
    }
}
