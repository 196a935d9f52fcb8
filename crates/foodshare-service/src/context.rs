//! Request context carrying the resolved caller and role.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foodshare_core::error::AppError;
use foodshare_core::traits::identity::IdentityProvider;
use foodshare_core::types::{Role, UserId};

/// Context for the current caller.
///
/// Resolved from the identity provider and passed into service methods so
/// that every operation knows *who* is acting and in *which* role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The caller's ID.
    pub user_id: UserId,
    /// The caller's role.
    pub role: Role,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Resolves the signed-in caller and their role.
    pub async fn resolve(identity: &dyn IdentityProvider) -> Result<Self, AppError> {
        let user_id = identity
            .current_caller_id()
            .ok_or_else(|| AppError::forbidden("No signed-in caller"))?;
        Self::for_user(identity, user_id).await
    }

    /// Resolves the role of a known user.
    pub async fn for_user(
        identity: &dyn IdentityProvider,
        user_id: UserId,
    ) -> Result<Self, AppError> {
        let role = identity
            .role_of(&user_id)
            .await?
            .ok_or_else(|| AppError::forbidden(format!("User {user_id} has no role")))?;
        Ok(Self::new(user_id, role))
    }

    /// Returns whether the caller is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with `Forbidden` unless the caller holds `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "This action requires the {role} role, caller is {}",
                self.role
            )))
        }
    }
}
