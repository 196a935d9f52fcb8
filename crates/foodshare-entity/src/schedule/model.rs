//! Fulfillment schedule entity model.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use foodshare_core::types::{DonationId, ScheduleId};
use serde::{Deserialize, Serialize};

use crate::donation::DonationMethod;

/// The pickup or drop-off arrangement of one donation.
///
/// Stored under the donation id, so a donation can have at most one.
/// Written once at creation and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentSchedule {
    /// Unique schedule identifier.
    pub id: ScheduleId,
    /// The donation this schedule belongs to.
    pub donation_id: DonationId,
    /// Method-specific fields, tagged by `method`.
    #[serde(flatten)]
    pub details: ScheduleDetails,
    /// When the schedule was recorded.
    pub scheduled_at: DateTime<Utc>,
}

impl FulfillmentSchedule {
    /// Collection holding schedules, keyed by donation id.
    pub const COLLECTION: &'static str = "fulfillmentSchedules";

    /// The method this schedule was made for.
    pub fn method(&self) -> DonationMethod {
        self.details.method()
    }
}

/// Method-specific schedule fields.
///
/// Only the chosen method's fields exist in the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "camelCase")]
pub enum ScheduleDetails {
    /// The collector comes to the donor.
    #[serde(rename_all = "camelCase")]
    LocationPickup {
        /// Street address.
        pickup_address: String,
        /// City.
        pickup_city: String,
        /// Country.
        pickup_country: String,
        /// Agreed pickup time.
        pickup_date_time: DateTime<Utc>,
    },
    /// The donor brings the food to a facility.
    #[serde(rename_all = "camelCase")]
    Dropoff {
        /// Receiving facility.
        facility_name: String,
        /// Drop-off day.
        dropoff_date: NaiveDate,
        /// Drop-off time of day.
        dropoff_time: NaiveTime,
    },
}

impl ScheduleDetails {
    /// The method tag of these details.
    pub fn method(&self) -> DonationMethod {
        match self {
            Self::LocationPickup { .. } => DonationMethod::LocationPickup,
            Self::Dropoff { .. } => DonationMethod::Dropoff,
        }
    }
}
