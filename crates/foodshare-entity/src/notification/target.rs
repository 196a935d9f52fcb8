//! Notification delivery target.

use std::collections::BTreeSet;

use foodshare_core::types::{Role, UserId};
use foodshare_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Who a notification is delivered to: one user, or everyone with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "targetKind", rename_all = "camelCase")]
pub enum NotificationTarget {
    /// A single user.
    #[serde(rename_all = "camelCase")]
    User {
        /// The receiving user.
        target_user_id: UserId,
    },
    /// Every user holding one of the roles.
    Audience {
        /// The receiving roles. Never empty.
        audience: BTreeSet<Role>,
    },
}

impl NotificationTarget {
    /// Target a single user.
    pub fn user(user_id: UserId) -> Self {
        Self::User {
            target_user_id: user_id,
        }
    }

    /// Target a role audience. Fails if `roles` is empty.
    pub fn audience(roles: impl IntoIterator<Item = Role>) -> AppResult<Self> {
        let audience: BTreeSet<Role> = roles.into_iter().collect();
        if audience.is_empty() {
            return Err(AppError::validation("Notification audience must not be empty"));
        }
        Ok(Self::Audience { audience })
    }

    /// Build a target from the optional pair, requiring exactly one side.
    pub fn from_parts(user: Option<UserId>, audience: Option<Vec<Role>>) -> AppResult<Self> {
        match (user, audience) {
            (Some(user_id), None) => Ok(Self::user(user_id)),
            (None, Some(roles)) => Self::audience(roles),
            (Some(_), Some(_)) => Err(AppError::validation(
                "A notification targets either a user or an audience, not both",
            )),
            (None, None) => Err(AppError::validation(
                "A notification needs a target user or an audience",
            )),
        }
    }

    /// The key segment for this target: the user id, or `"audience"`.
    pub fn key_segment(&self) -> String {
        match self {
            Self::User { target_user_id } => target_user_id.to_string(),
            Self::Audience { .. } => "audience".to_string(),
        }
    }

    /// Check if a viewer with this id and role receives the notification.
    pub fn reaches(&self, user_id: &UserId, role: Role) -> bool {
        match self {
            Self::User { target_user_id } => target_user_id == user_id,
            Self::Audience { audience } => audience.contains(&role),
        }
    }
}
