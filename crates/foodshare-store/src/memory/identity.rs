//! In-memory identity and role provider.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use foodshare_core::result::AppResult;
use foodshare_core::traits::identity::IdentityProvider;
use foodshare_core::types::{Role, UserId};

/// Role registry with a single signed-in caller.
///
/// Suitable for tests and single-user hosts; multi-user hosts resolve the
/// caller per request instead.
#[derive(Debug, Default)]
pub struct MemoryIdentityProvider {
    /// User → role.
    roles: DashMap<UserId, Role>,
    /// The signed-in user.
    current: RwLock<Option<UserId>>,
}

impl MemoryIdentityProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a role, replacing any previous role.
    pub fn register(&self, user_id: UserId, role: Role) {
        self.roles.insert(user_id, role);
        info!(user_id = %user_id, role = %role, "Registered user");
    }

    /// Register a fresh user with a role and return the id.
    pub fn register_new(&self, role: Role) -> UserId {
        let user_id = UserId::new();
        self.register(user_id, role);
        user_id
    }

    /// Make `user_id` the signed-in caller.
    pub fn sign_in(&self, user_id: UserId) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(user_id);
    }

    /// Clear the signed-in caller.
    pub fn sign_out(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    fn current_caller_id(&self) -> Option<UserId> {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    async fn role_of(&self, user_id: &UserId) -> AppResult<Option<Role>> {
        Ok(self.roles.get(user_id).map(|role| *role))
    }
}
