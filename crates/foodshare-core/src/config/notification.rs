//! Notification fan-out configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::Role;

/// Notification fan-out settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Roles that receive the `newDonationAvailable` broadcast.
    #[serde(default = "default_new_donation_audience")]
    pub new_donation_audience: Vec<Role>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            new_donation_audience: default_new_donation_audience(),
        }
    }
}

impl NotificationConfig {
    /// Fails if no role would hear about new donations.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.new_donation_audience.is_empty() {
            return Err(AppError::configuration(
                "notifications.new_donation_audience must name at least one role",
            ));
        }
        Ok(())
    }
}

fn default_new_donation_audience() -> Vec<Role> {
    vec![Role::Admin, Role::Ngo]
}
