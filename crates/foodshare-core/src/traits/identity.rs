//! Identity and role provider trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Role, UserId};

/// Resolves who is calling and what role they hold.
///
/// The core never computes identities itself; authentication lives with
/// the host application.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The signed-in caller, if any.
    fn current_caller_id(&self) -> Option<UserId>;

    /// The role of a user, if the user is known.
    async fn role_of(&self, user_id: &UserId) -> AppResult<Option<Role>>;
}
