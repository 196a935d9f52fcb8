//! Donation lifecycle domain events.

use serde::{Deserialize, Serialize};

use crate::types::{DonationId, UserId};

/// Events related to donation lifecycle operations.
///
/// Statuses are carried as their storage strings so this crate stays free of
/// entity types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DonationEvent {
    /// A donation and its schedule were written.
    Created {
        /// The donation ID.
        donation_id: DonationId,
    },
    /// An NGO claimed a pending donation.
    Accepted {
        /// The donation ID.
        donation_id: DonationId,
        /// The claiming NGO.
        collector_id: UserId,
    },
    /// An NGO hid a pending donation from its own list.
    RejectedByNgo {
        /// The donation ID.
        donation_id: DonationId,
        /// The NGO that rejected it.
        ngo_id: UserId,
    },
    /// A table-driven status transition was applied.
    StatusChanged {
        /// The donation ID.
        donation_id: DonationId,
        /// Previous status.
        from: String,
        /// New status.
        to: String,
    },
    /// An admin forced a status outside the transition table.
    ForcedStatus {
        /// The donation ID.
        donation_id: DonationId,
        /// Previous status.
        from: String,
        /// New status.
        to: String,
        /// Free-text reason given by the admin.
        reason: Option<String>,
    },
    /// A terminal donation was copied into a new pending donation.
    Redonated {
        /// The new donation ID.
        donation_id: DonationId,
        /// The terminal source donation.
        source_id: DonationId,
    },
    /// A half-written creation was rolled back.
    CreationRolledBack {
        /// The donation ID that was never written.
        donation_id: DonationId,
        /// Why the donation write failed.
        reason: String,
    },
}

impl DonationEvent {
    /// The donation this event concerns.
    pub fn donation_id(&self) -> DonationId {
        match self {
            Self::Created { donation_id }
            | Self::Accepted { donation_id, .. }
            | Self::RejectedByNgo { donation_id, .. }
            | Self::StatusChanged { donation_id, .. }
            | Self::ForcedStatus { donation_id, .. }
            | Self::Redonated { donation_id, .. }
            | Self::CreationRolledBack { donation_id, .. } => *donation_id,
        }
    }

    /// Dotted action name used in audit records.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Created { .. } => "donation.created",
            Self::Accepted { .. } => "donation.accepted",
            Self::RejectedByNgo { .. } => "donation.rejected_by_ngo",
            Self::StatusChanged { .. } => "donation.status_changed",
            Self::ForcedStatus { .. } => "donation.forced_status",
            Self::Redonated { .. } => "donation.redonated",
            Self::CreationRolledBack { .. } => "donation.creation_rolled_back",
        }
    }
}
