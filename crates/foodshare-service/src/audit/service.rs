//! Audit log writer and reader.

use tracing::info;

use foodshare_core::events::DomainEvent;
use foodshare_core::result::AppResult;
use foodshare_core::types::{DonationId, FilterField};
use foodshare_entity::audit::AuditLogEntry;

use crate::records::Records;

/// Records audit log entries.
#[derive(Debug, Clone)]
pub struct AuditService {
    /// Record store handle.
    records: Records,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// Writes an entry describing `event`.
    pub async fn record(&self, event: &DomainEvent) -> AppResult<AuditLogEntry> {
        let entry = AuditLogEntry::from_event(event);
        self.records
            .set(AuditLogEntry::COLLECTION, &entry.id.key(), &entry)
            .await?;
        info!(
            audit_id = %entry.id,
            action = %entry.action,
            target_id = entry.target_id.as_deref().unwrap_or("-"),
            "Audit entry recorded"
        );
        Ok(entry)
    }

    /// Every entry about a donation, oldest first.
    pub async fn entries_for(&self, donation_id: DonationId) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .records
            .query(
                AuditLogEntry::COLLECTION,
                &[
                    FilterField::eq("targetType", "donation"),
                    FilterField::eq("targetId", donation_id.key()),
                ],
            )
            .await?;
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}
