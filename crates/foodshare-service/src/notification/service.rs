//! Derives notification records from lifecycle events.

use tracing::debug;

use foodshare_core::result::AppResult;
use foodshare_core::types::{DonationId, Role, UserId};
use foodshare_entity::notification::{
    NotificationEventType, NotificationRecord, NotificationTarget,
};

use crate::records::Records;

/// Writes notification records.
///
/// Records are keyed deterministically by event, donation, and target, and
/// written with last-write-wins upserts, so firing the same logical event
/// again converges on one record.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Record store handle.
    records: Records,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// Notifies exactly one of a user or a role audience.
    ///
    /// Fails with `Validation` if both or neither are given, or if the
    /// audience is empty.
    pub async fn notify(
        &self,
        event_type: NotificationEventType,
        related_donation_id: Option<DonationId>,
        target_user_id: Option<UserId>,
        audience: Option<Vec<Role>>,
    ) -> AppResult<NotificationRecord> {
        let target = NotificationTarget::from_parts(target_user_id, audience)?;
        self.send(event_type, related_donation_id, target).await
    }

    /// Notifies a single user.
    pub async fn notify_user(
        &self,
        event_type: NotificationEventType,
        related_donation_id: Option<DonationId>,
        user_id: UserId,
    ) -> AppResult<NotificationRecord> {
        self.send(
            event_type,
            related_donation_id,
            NotificationTarget::user(user_id),
        )
        .await
    }

    /// Notifies every user holding one of `roles`.
    pub async fn notify_audience(
        &self,
        event_type: NotificationEventType,
        related_donation_id: Option<DonationId>,
        roles: &[Role],
    ) -> AppResult<NotificationRecord> {
        let target = NotificationTarget::audience(roles.iter().copied())?;
        self.send(event_type, related_donation_id, target).await
    }

    async fn send(
        &self,
        event_type: NotificationEventType,
        related_donation_id: Option<DonationId>,
        target: NotificationTarget,
    ) -> AppResult<NotificationRecord> {
        let record = NotificationRecord::new(event_type, related_donation_id, target);
        self.records
            .set(NotificationRecord::COLLECTION, record.id.as_str(), &record)
            .await?;
        debug!(key = %record.id, event = %event_type, "Notification written");
        Ok(record)
    }
}
