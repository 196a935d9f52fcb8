//! Notification event taxonomy and its fixed display content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display content derived from an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationContent {
    /// Headline.
    pub title: &'static str,
    /// One-line body.
    pub subtitle: &'static str,
    /// Icon name understood by the UI.
    pub icon: &'static str,
}

/// Closed set of events that produce notification records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationEventType {
    /// A donor created a donation.
    DonationCreated,
    /// A new donation is waiting for an NGO.
    NewDonationAvailable,
    /// The collector picked the donation up.
    DonationCollected,
    /// A donation passed its expiry date.
    DonationExpired,
    /// A new account was created.
    UserRegistered,
    /// A profile changed.
    ProfileUpdated,
    /// An admin approved an account.
    UserApproved,
    /// An NGO accepted a donation.
    NgoAssignedDonation,
    /// An NGO scheduled a pickup.
    NgoPickupScheduled,
    /// A pickup is coming up.
    PickupReminder,
    /// An item is about to expire.
    ItemExpiryWarning,
}

impl NotificationEventType {
    /// Every event type.
    pub const ALL: [Self; 11] = [
        Self::DonationCreated,
        Self::NewDonationAvailable,
        Self::DonationCollected,
        Self::DonationExpired,
        Self::UserRegistered,
        Self::ProfileUpdated,
        Self::UserApproved,
        Self::NgoAssignedDonation,
        Self::NgoPickupScheduled,
        Self::PickupReminder,
        Self::ItemExpiryWarning,
    ];

    /// Return the event type as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonationCreated => "donationCreated",
            Self::NewDonationAvailable => "newDonationAvailable",
            Self::DonationCollected => "donationCollected",
            Self::DonationExpired => "donationExpired",
            Self::UserRegistered => "userRegistered",
            Self::ProfileUpdated => "profileUpdated",
            Self::UserApproved => "userApproved",
            Self::NgoAssignedDonation => "ngoAssignedDonation",
            Self::NgoPickupScheduled => "ngoPickupScheduled",
            Self::PickupReminder => "pickupReminder",
            Self::ItemExpiryWarning => "itemExpiryWarning",
        }
    }

    /// The fixed display content for this event type.
    pub fn content(&self) -> NotificationContent {
        let (title, subtitle, icon) = match self {
            Self::DonationCreated => (
                "Donation created",
                "Your donation has been listed.",
                "gift",
            ),
            Self::NewDonationAvailable => (
                "New donation available",
                "A new donation is waiting to be collected.",
                "bell",
            ),
            Self::DonationCollected => (
                "Donation collected",
                "Your donation has been collected.",
                "truck",
            ),
            Self::DonationExpired => (
                "Donation expired",
                "A donation has passed its expiry date.",
                "clock",
            ),
            Self::UserRegistered => (
                "Welcome",
                "Your account has been created.",
                "user-plus",
            ),
            Self::ProfileUpdated => (
                "Profile updated",
                "Your profile changes have been saved.",
                "user",
            ),
            Self::UserApproved => (
                "Account approved",
                "Your account has been approved.",
                "check-circle",
            ),
            Self::NgoAssignedDonation => (
                "Donation accepted",
                "An organisation has accepted your donation.",
                "handshake",
            ),
            Self::NgoPickupScheduled => (
                "Pickup scheduled",
                "A pickup has been scheduled for your donation.",
                "calendar",
            ),
            Self::PickupReminder => (
                "Pickup reminder",
                "A pickup is coming up soon.",
                "alarm",
            ),
            Self::ItemExpiryWarning => (
                "Expiring soon",
                "An item in your donation is about to expire.",
                "alert-triangle",
            ),
        };
        NotificationContent {
            title,
            subtitle,
            icon,
        }
    }
}

impl fmt::Display for NotificationEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationEventType {
    type Err = foodshare_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| {
                foodshare_core::AppError::validation(format!(
                    "Invalid notification event type: '{s}'"
                ))
            })
    }
}
