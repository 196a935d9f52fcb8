//! Donor stats entity model.

use std::collections::BTreeSet;

use foodshare_core::types::DonationId;
use serde::{Deserialize, Serialize};

use crate::donation::ImpactType;

/// Per-donor impact counters, keyed by donor id.
///
/// Every change is a [`DonorCredit`] recorded under its key in `credited`,
/// so applying the same credit twice leaves the counters unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DonorStats {
    /// Donations created by the donor, redonations included.
    pub total_donations: i64,
    /// Donations that reached `delivered`.
    pub delivered_donations: i64,
    /// Units delivered from donations with the `mealsProvided` impact type.
    pub meals_provided: i64,
    /// Units delivered from donations with the `wastePrevented` impact type.
    pub waste_prevented: i64,
    /// Keys of the credits already applied.
    pub credited: BTreeSet<String>,
    /// Bumped on every write; the precondition of the next one.
    pub revision: i64,
}

impl DonorStats {
    /// Collection holding donor stats.
    pub const COLLECTION: &'static str = "donorStats";

    /// Stored field name of `revision`.
    pub const REVISION: &'static str = "revision";

    /// Check if `credit` was already applied.
    pub fn has_credit(&self, credit: &DonorCredit) -> bool {
        self.credited.contains(&credit.key())
    }

    /// Apply `credit` unless already applied. Returns `true` if the counters
    /// changed.
    pub fn apply(&mut self, credit: &DonorCredit) -> bool {
        if !self.credited.insert(credit.key()) {
            return false;
        }
        match *credit {
            DonorCredit::Created { .. } => self.total_donations += 1,
            DonorCredit::Delivered {
                impact_type,
                quantity,
                ..
            } => {
                self.delivered_donations += 1;
                let quantity = i64::from(quantity);
                match impact_type {
                    ImpactType::MealsProvided => self.meals_provided += quantity,
                    ImpactType::WastePrevented => self.waste_prevented += quantity,
                    ImpactType::Other => {}
                }
            }
        }
        self.revision += 1;
        true
    }
}

/// One change to a donor's counters, tied to the donation that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorCredit {
    /// A donation was created.
    Created {
        /// The new donation.
        donation_id: DonationId,
    },
    /// A donation was delivered.
    Delivered {
        /// The delivered donation.
        donation_id: DonationId,
        /// Which impact counter the quantity goes to.
        impact_type: ImpactType,
        /// Units delivered.
        quantity: u32,
    },
}

impl DonorCredit {
    /// The key recorded in [`DonorStats::credited`].
    pub fn key(&self) -> String {
        match self {
            Self::Created { donation_id } => format!("created:{donation_id}"),
            Self::Delivered { donation_id, .. } => format!("delivered:{donation_id}"),
        }
    }
}
