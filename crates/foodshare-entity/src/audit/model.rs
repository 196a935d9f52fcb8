//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use foodshare_core::events::DomainEvent;
use foodshare_core::types::{AuditLogId, UserId};
use serde::{Deserialize, Serialize};

/// An immutable audit log entry recording a privileged or corrective action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// The user who performed the action, if one was resolved.
    pub actor_id: Option<UserId>,
    /// The action that was performed (e.g., `"donation.forced_status"`).
    pub action: String,
    /// The type of target record (e.g., `"donation"`).
    pub target_type: String,
    /// The target record ID.
    pub target_id: Option<String>,
    /// Additional details about the action (JSON).
    pub details: Option<serde_json::Value>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Collection holding audit entries.
    pub const COLLECTION: &'static str = "auditLog";

    /// Build an entry describing a donation domain event.
    ///
    /// The whole event is kept under `details`.
    pub fn from_event(event: &DomainEvent) -> Self {
        Self {
            id: AuditLogId::new(),
            actor_id: event.actor_id,
            action: event.action().to_string(),
            target_type: "donation".to_string(),
            target_id: Some(event.payload.donation_id().key()),
            details: serde_json::to_value(event).ok(),
            created_at: event.timestamp,
        }
    }
}
