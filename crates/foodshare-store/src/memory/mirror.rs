//! Profile mirror backed by a moka cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use foodshare_core::config::MirrorConfig;
use foodshare_core::result::AppResult;
use foodshare_core::traits::profile_mirror::ProfileMirror;
use foodshare_core::traits::record_store::RecordStore;
use foodshare_core::types::{UserId, from_document};
use foodshare_entity::stats::DonorStats;

/// Mirrors each donor's stats from the record store for cheap reads.
#[derive(Debug, Clone)]
pub struct MemoryProfileMirror {
    /// Source of truth.
    store: Arc<dyn RecordStore>,
    /// Mirrored stats per donor.
    cache: Cache<UserId, DonorStats>,
}

impl MemoryProfileMirror {
    /// Create a mirror over `store` from configuration.
    pub fn new(store: Arc<dyn RecordStore>, config: &MirrorConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();
        Self { store, cache }
    }

    /// The mirrored stats of a donor, if refreshed and not yet expired.
    pub async fn get(&self, user_id: &UserId) -> Option<DonorStats> {
        self.cache.get(user_id).await
    }
}

#[async_trait]
impl ProfileMirror for MemoryProfileMirror {
    async fn refresh(&self, user_id: &UserId) -> AppResult<()> {
        let stats = match self
            .store
            .get(DonorStats::COLLECTION, &user_id.key())
            .await?
        {
            Some(doc) => from_document::<DonorStats>(doc)?,
            None => DonorStats::default(),
        };
        self.cache.insert(*user_id, stats).await;
        debug!(user_id = %user_id, "Refreshed profile mirror");
        Ok(())
    }
}
