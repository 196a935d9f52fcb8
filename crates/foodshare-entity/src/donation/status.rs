//! Donation status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a donation.
///
/// `Pending` is initial; `Rejected` and `Delivered` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    /// Waiting for an NGO.
    Pending,
    /// Claimed by a collector.
    Accepted,
    /// Picked up or dropped off.
    Collected,
    /// Reached the people it was meant for.
    Delivered,
    /// Turned down for good.
    Rejected,
}

impl DonationStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Accepted,
        Self::Collected,
        Self::Delivered,
        Self::Rejected,
    ];

    /// Return the status as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Collected => "collected",
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
        }
    }

    /// Check if no further transitions leave this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Rejected)
    }

    /// Check if a donation in this status must carry a collector.
    pub fn requires_collector(&self) -> bool {
        matches!(self, Self::Accepted | Self::Collected | Self::Delivered)
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = foodshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                foodshare_core::AppError::validation(format!(
                    "Invalid donation status: '{s}'. Expected one of: pending, accepted, collected, delivered, rejected"
                ))
            })
    }
}
