//! Notification record entity model.

use std::fmt;

use chrono::{DateTime, Utc};
use foodshare_core::types::DonationId;
use serde::{Deserialize, Serialize};

use super::event_type::NotificationEventType;
use super::target::NotificationTarget;

/// Deterministic notification record key.
///
/// Firing the same logical event for the same target always yields the same
/// key, so the record is overwritten rather than duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationKey(String);

impl NotificationKey {
    /// Derive the key from its three parts.
    pub fn derive(
        event_type: NotificationEventType,
        related_donation_id: Option<DonationId>,
        target: &NotificationTarget,
    ) -> Self {
        let donation = related_donation_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "none".to_string());
        Self(format!(
            "{}_{}_{}",
            event_type.as_str(),
            donation,
            target.key_segment()
        ))
    }

    /// The key as a record store id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification shown in a viewer's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// Deterministic key.
    pub id: NotificationKey,
    /// What happened.
    pub event_type: NotificationEventType,
    /// Headline derived from the event type.
    pub title: String,
    /// Body derived from the event type.
    pub subtitle: String,
    /// Icon derived from the event type.
    pub icon: String,
    /// The donation this notification concerns.
    pub related_donation_id: Option<DonationId>,
    /// Who receives it.
    #[serde(flatten)]
    pub target: NotificationTarget,
    /// When the record was last written.
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Collection holding notification records.
    pub const COLLECTION: &'static str = "notifications";

    /// Stored field name of the direct target.
    pub const TARGET_USER_ID: &'static str = "targetUserId";
    /// Stored field name of the audience roles.
    pub const AUDIENCE: &'static str = "audience";

    /// Build a record with content and key derived from the event type.
    pub fn new(
        event_type: NotificationEventType,
        related_donation_id: Option<DonationId>,
        target: NotificationTarget,
    ) -> Self {
        let content = event_type.content();
        Self {
            id: NotificationKey::derive(event_type, related_donation_id, &target),
            event_type,
            title: content.title.to_string(),
            subtitle: content.subtitle.to_string(),
            icon: content.icon.to_string(),
            related_donation_id,
            target,
            created_at: Utc::now(),
        }
    }
}
