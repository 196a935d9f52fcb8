//! Pending donations an NGO has not rejected.

use futures::StreamExt;
use futures::stream::BoxStream;

use foodshare_core::result::AppResult;
use foodshare_core::types::{FilterField, UserId};
use foodshare_entity::donation::{Donation, DonationStatus};

use crate::records::Records;

/// Serves the pending-donation list of each NGO.
#[derive(Debug, Clone)]
pub struct VisibilityService {
    /// Record store handle.
    records: Records,
}

impl VisibilityService {
    /// Creates a new visibility service.
    pub fn new(records: Records) -> Self {
        Self { records }
    }

    fn filters(ngo_id: &UserId) -> Vec<FilterField> {
        vec![
            FilterField::eq(Donation::STATUS, DonationStatus::Pending.as_str()),
            FilterField::not_contains(Donation::REJECTED_BY, ngo_id.key()),
        ]
    }

    /// Live list of donations visible to `ngo_id`, newest first.
    ///
    /// Each call opens a fresh subscription; dropping the stream closes it.
    pub async fn visible_pending(
        &self,
        ngo_id: UserId,
    ) -> AppResult<BoxStream<'static, AppResult<Vec<Donation>>>> {
        let snapshots = self
            .records
            .subscribe::<Donation>(Donation::COLLECTION, Self::filters(&ngo_id))
            .await?;
        Ok(snapshots
            .map(move |snapshot| {
                snapshot.map(|mut donations| {
                    donations.retain(|d| d.is_visible_to(&ngo_id));
                    order_newest_first(&mut donations);
                    donations
                })
            })
            .boxed())
    }

    /// The current list of donations visible to `ngo_id`, newest first.
    pub async fn visible_pending_snapshot(&self, ngo_id: UserId) -> AppResult<Vec<Donation>> {
        let mut donations: Vec<Donation> = self
            .records
            .query(Donation::COLLECTION, &Self::filters(&ngo_id))
            .await?;
        donations.retain(|d| d.is_visible_to(&ngo_id));
        order_newest_first(&mut donations);
        Ok(donations)
    }
}

/// Sorts by creation time descending, ties broken by id descending.
pub fn order_newest_first(donations: &mut [Donation]) {
    donations.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
