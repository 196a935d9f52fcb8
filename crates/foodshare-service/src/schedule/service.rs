//! One-to-one pickup or drop-off schedule per donation.

use chrono::Utc;
use tracing::{debug, info};

use foodshare_core::error::AppError;
use foodshare_core::result::AppResult;
use foodshare_core::types::{DonationId, ScheduleId};
use foodshare_entity::donation::DonationMethod;
use foodshare_entity::schedule::{FulfillmentSchedule, ScheduleDetails, SchedulePayload};

use crate::records::Records;

/// Writes and reads fulfillment schedules.
///
/// Schedules are stored under their donation's id and created with
/// create-if-absent semantics, so a donation never has two.
#[derive(Debug, Clone)]
pub struct ScheduleService {
    /// Record store handle.
    records: Records,
}

impl ScheduleService {
    /// Creates a new schedule service.
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    /// Validates `payload` against `method` and persists the schedule.
    ///
    /// Fails with `Conflict` if the donation already has a schedule.
    pub async fn schedule(
        &self,
        donation_id: DonationId,
        method: DonationMethod,
        payload: SchedulePayload,
    ) -> AppResult<FulfillmentSchedule> {
        let details = payload.into_details(method)?;
        self.schedule_details(donation_id, details).await
    }

    /// Persists already-validated schedule details.
    pub async fn schedule_details(
        &self,
        donation_id: DonationId,
        details: ScheduleDetails,
    ) -> AppResult<FulfillmentSchedule> {
        let schedule = FulfillmentSchedule {
            id: ScheduleId::new(),
            donation_id,
            details,
            scheduled_at: Utc::now(),
        };

        let created = self
            .records
            .insert(FulfillmentSchedule::COLLECTION, &donation_id.key(), &schedule)
            .await?;
        if !created {
            return Err(AppError::conflict(format!(
                "Donation {donation_id} already has a fulfillment schedule"
            )));
        }

        info!(
            donation_id = %donation_id,
            schedule_id = %schedule.id,
            method = %schedule.method(),
            "Fulfillment schedule created"
        );
        Ok(schedule)
    }

    /// The schedule of a donation, if any.
    pub async fn schedule_for(
        &self,
        donation_id: DonationId,
    ) -> AppResult<Option<FulfillmentSchedule>> {
        self.records
            .get(FulfillmentSchedule::COLLECTION, &donation_id.key())
            .await
    }

    /// Deletes the schedule of a donation whose creation was abandoned.
    pub(crate) async fn remove(&self, donation_id: DonationId) -> AppResult<bool> {
        let removed = self
            .records
            .delete(FulfillmentSchedule::COLLECTION, &donation_id.key())
            .await?;
        debug!(donation_id = %donation_id, removed, "Fulfillment schedule removed");
        Ok(removed)
    }
}
