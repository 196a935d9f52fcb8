//! Caller role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// Roles resolved by the identity provider.
///
/// The lowercase names round-trip through storage and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Pledges donations.
    Donor,
    /// Collects donations.
    Ngo,
    /// Oversees the platform.
    Admin,
}

impl Role {
    /// Return the role as its storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donor => "donor",
            Self::Ngo => "ngo",
            Self::Admin => "admin",
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "donor" => Ok(Self::Donor),
            "ngo" => Ok(Self::Ngo),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: donor, ngo, admin"
            ))),
        }
    }
}
