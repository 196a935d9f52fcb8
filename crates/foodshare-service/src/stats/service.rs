//! Donor stats counters and profile mirror refresh.

use std::sync::Arc;

use tracing::{debug, warn};

use foodshare_core::error::AppError;
use foodshare_core::result::AppResult;
use foodshare_core::traits::profile_mirror::ProfileMirror;
use foodshare_core::traits::record_store::UpdateOutcome;
use foodshare_core::types::{DonationId, FilterField, UserId, to_document};
use foodshare_entity::donation::Donation;
use foodshare_entity::stats::{DonorCredit, DonorStats};

use crate::records::Records;

/// Attempts at a stats write before giving up under contention.
const MAX_CREDIT_ATTEMPTS: usize = 16;

/// Maintains per-donor impact counters.
///
/// Each credit is keyed by its donation, and the stats record is rewritten
/// with a precondition on its revision, so repeating a credit is a no-op.
/// After each credit the donor's profile mirror is refreshed; a failed
/// refresh is logged and does not fail the caller.
#[derive(Debug, Clone)]
pub struct StatsService {
    /// Record store handle.
    records: Records,
    /// Profile mirror to refresh after counter changes.
    mirror: Arc<dyn ProfileMirror>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(records: Records, mirror: Arc<dyn ProfileMirror>) -> Self {
        Self { records, mirror }
    }

    /// Counts a newly created donation.
    pub async fn record_created(&self, donor_id: UserId, donation_id: DonationId) -> AppResult<()> {
        self.credit(donor_id, DonorCredit::Created { donation_id })
            .await
    }

    /// Counts a delivered donation and credits its impact.
    pub async fn record_delivered(&self, donation: &Donation) -> AppResult<()> {
        self.credit(
            donation.donor_id,
            DonorCredit::Delivered {
                donation_id: donation.id,
                impact_type: donation.impact_type,
                quantity: donation.quantity,
            },
        )
        .await
    }

    /// Applies `credit` to the donor's stats at most once.
    async fn credit(&self, donor_id: UserId, credit: DonorCredit) -> AppResult<()> {
        let key = donor_id.key();
        for _ in 0..MAX_CREDIT_ATTEMPTS {
            let current: Option<DonorStats> =
                self.records.get(DonorStats::COLLECTION, &key).await?;

            let written = match current {
                None => {
                    let mut stats = DonorStats::default();
                    stats.apply(&credit);
                    self.records
                        .insert(DonorStats::COLLECTION, &key, &stats)
                        .await?
                }
                Some(stats) if stats.has_credit(&credit) => {
                    debug!(donor_id = %donor_id, credit = %credit.key(), "Credit already applied");
                    return Ok(());
                }
                Some(mut stats) => {
                    let expected = [FilterField::eq(DonorStats::REVISION, stats.revision)];
                    stats.apply(&credit);
                    let outcome = self
                        .records
                        .conditional_update(
                            DonorStats::COLLECTION,
                            &key,
                            to_document(&stats)?,
                            &expected,
                        )
                        .await?;
                    matches!(outcome, UpdateOutcome::Applied(_))
                }
            };

            if written {
                debug!(donor_id = %donor_id, credit = %credit.key(), "Donor stats credited");
                self.refresh_mirror(donor_id).await;
                return Ok(());
            }
        }

        warn!(donor_id = %donor_id, credit = %credit.key(), "Donor stats write kept losing races");
        Err(AppError::store_unavailable(format!(
            "Could not update stats of donor {donor_id}, try again"
        )))
    }

    /// The current counters of a donor.
    pub async fn stats_for(&self, donor_id: UserId) -> AppResult<DonorStats> {
        Ok(self
            .records
            .get(DonorStats::COLLECTION, &donor_id.key())
            .await?
            .unwrap_or_default())
    }

    async fn refresh_mirror(&self, user_id: UserId) {
        if let Err(e) = self.mirror.refresh(&user_id).await {
            warn!(user_id = %user_id, error = %e, "Profile mirror refresh failed");
        }
    }
}
