//! Profile mirror trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::UserId;

/// Low-latency mirror of profile fields kept for fast reads.
///
/// Refreshes are idempotent; a duplicate refresh is harmless.
#[async_trait]
pub trait ProfileMirror: Send + Sync + std::fmt::Debug + 'static {
    /// Re-read the primary records for `user_id` and update the mirror.
    async fn refresh(&self, user_id: &UserId) -> AppResult<()>;
}
