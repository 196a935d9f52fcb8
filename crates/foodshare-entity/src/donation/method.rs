//! Donation fulfillment method.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a donation reaches the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DonationMethod {
    /// The collector picks the food up from the donor.
    LocationPickup,
    /// The donor drops the food off at a facility.
    Dropoff,
}

impl DonationMethod {
    /// Return the method as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocationPickup => "locationPickup",
            Self::Dropoff => "dropoff",
        }
    }
}

impl fmt::Display for DonationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DonationMethod {
    type Err = foodshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "locationPickup" => Ok(Self::LocationPickup),
            "dropoff" => Ok(Self::Dropoff),
            _ => Err(foodshare_core::AppError::validation(format!(
                "Invalid donation method: '{s}'. Expected one of: locationPickup, dropoff"
            ))),
        }
    }
}
