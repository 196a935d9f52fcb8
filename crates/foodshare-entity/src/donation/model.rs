//! Donation entity model.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use foodshare_core::types::{DonationId, ScheduleId, UserId};
use serde::{Deserialize, Serialize};

use super::category::{FoodCategory, ImpactType};
use super::method::DonationMethod;
use super::status::DonationStatus;

/// A pledge of food moving through the donation lifecycle.
///
/// `collector_id` is `None` exactly while the donation has never left
/// `pending` (or was rejected by an admin before any NGO claimed it); once
/// set it never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Client-generated identifier chosen before the first write.
    pub id: DonationId,
    /// The donor who pledged the food. Immutable.
    pub donor_id: UserId,
    /// The NGO that accepted the donation.
    pub collector_id: Option<UserId>,
    /// What is being donated.
    #[serde(rename = "item")]
    pub item_name: String,
    /// How many units. Always positive.
    pub quantity: u32,
    /// Unit of `quantity` (e.g., "kg", "boxes").
    pub unit: String,
    /// Food category.
    pub category: FoodCategory,
    /// What the donation counts towards once delivered.
    pub impact_type: ImpactType,
    /// Opaque image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Pickup or drop-off.
    pub method: DonationMethod,
    /// Current lifecycle state.
    pub status: DonationStatus,
    /// When the food was made.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_date: Option<NaiveDate>,
    /// When the food expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// Donor display name at creation time.
    pub donor_name: String,
    /// Donor city at creation time.
    pub donor_city: String,
    /// The one fulfillment schedule of this donation.
    pub schedule_id: Option<ScheduleId>,
    /// NGOs that hid this donation from their pending list.
    #[serde(default)]
    pub rejected_by: BTreeSet<UserId>,
    /// Whether this donation was copied from a terminal one.
    #[serde(default)]
    pub is_redonation: bool,
    /// The terminal donation this one was copied from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_donation_id: Option<DonationId>,
    /// When the donation was created.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Donation {
    /// Collection holding donations.
    pub const COLLECTION: &'static str = "donations";

    /// Stored field name of `status`.
    pub const STATUS: &'static str = "status";
    /// Stored field name of `collector_id`.
    pub const COLLECTOR_ID: &'static str = "collectorId";
    /// Stored field name of `donor_id`.
    pub const DONOR_ID: &'static str = "donorId";
    /// Stored field name of `rejected_by`.
    pub const REJECTED_BY: &'static str = "rejectedBy";
    /// Stored field name of `updated_at`.
    pub const UPDATED_AT: &'static str = "updatedAt";

    /// Check if `user_id` is the collector of this donation.
    pub fn is_collector(&self, user_id: &UserId) -> bool {
        self.collector_id.as_ref() == Some(user_id)
    }

    /// Check if this donation shows up in `ngo_id`'s pending list.
    pub fn is_visible_to(&self, ngo_id: &UserId) -> bool {
        self.status == DonationStatus::Pending && !self.rejected_by.contains(ngo_id)
    }

    /// Check if the stored state satisfies the collector invariant.
    pub fn collector_invariant_holds(&self) -> bool {
        match self.collector_id {
            Some(_) => self.status != DonationStatus::Pending,
            None => !self.status.requires_collector(),
        }
    }
}
