//! In-memory record store using dashmap, with a broadcast change feed per
//! collection for live queries.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::StreamExt;
use futures::stream;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use foodshare_core::config::StoreConfig;
use foodshare_core::error::AppError;
use foodshare_core::result::AppResult;
use foodshare_core::traits::record_store::{RecordStore, SnapshotStream, UpdateOutcome};
use foodshare_core::types::{Document, FilterField, matches_all};

/// One named collection and its change feed.
#[derive(Debug, Clone)]
struct Collection {
    /// Record id → document.
    records: Arc<DashMap<String, Document>>,
    /// Fires once after every write.
    changes: broadcast::Sender<()>,
}

impl Collection {
    fn new(buffer_size: usize) -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            changes: broadcast::channel(buffer_size.max(1)).0,
        }
    }

    /// Matching documents ordered by record id.
    fn snapshot(&self, filters: &[FilterField]) -> Vec<Document> {
        let mut rows: Vec<(String, Document)> = self
            .records
            .iter()
            .filter(|entry| matches_all(filters, entry.value()))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        rows.into_iter().map(|(_, doc)| doc).collect()
    }

    fn notify(&self) {
        // No receivers is not an error.
        let _ = self.changes.send(());
    }
}

/// In-memory record store.
///
/// Every mutation runs under the record's shard lock without awaiting, which
/// makes conditional writes atomic per record.
#[derive(Debug, Clone)]
pub struct MemoryRecordStore {
    /// Collection name → collection.
    collections: Arc<DashMap<String, Collection>>,
    /// Change feed buffer size for new collections.
    buffer_size: usize,
}

impl MemoryRecordStore {
    /// Create an empty store from configuration.
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            collections: Arc::new(DashMap::new()),
            buffer_size: config.change_buffer_size,
        }
    }

    fn collection(&self, name: &str) -> Collection {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(self.buffer_size))
            .clone()
    }

    /// Number of records in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.records.len())
            .unwrap_or(0)
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    fn backend_name(&self) -> &str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        Ok(self
            .collection(collection)
            .records
            .get(id)
            .map(|doc| doc.value().clone()))
    }

    async fn query(&self, collection: &str, filters: &[FilterField]) -> AppResult<Vec<Document>> {
        Ok(self.collection(collection).snapshot(filters))
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> AppResult<()> {
        let col = self.collection(collection);
        col.records.insert(id.to_string(), doc);
        col.notify();
        Ok(())
    }

    async fn insert(&self, collection: &str, id: &str, doc: Document) -> AppResult<bool> {
        let col = self.collection(collection);
        let inserted = match col.records.entry(id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(doc);
                true
            }
        };
        if inserted {
            col.notify();
        } else {
            debug!(collection, id, "Insert skipped, record exists");
        }
        Ok(inserted)
    }

    async fn conditional_update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
        precondition: &[FilterField],
    ) -> AppResult<UpdateOutcome> {
        let col = self.collection(collection);
        let outcome = {
            let Some(mut doc) = col.records.get_mut(id) else {
                return Ok(UpdateOutcome::Missing);
            };
            if !matches_all(precondition, doc.value()) {
                return Ok(UpdateOutcome::PreconditionFailed(doc.value().clone()));
            }
            for (field, value) in patch {
                doc.insert(field, value);
            }
            UpdateOutcome::Applied(doc.value().clone())
        };
        col.notify();
        Ok(outcome)
    }

    async fn append_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
        precondition: &[FilterField],
    ) -> AppResult<UpdateOutcome> {
        let col = self.collection(collection);
        let (outcome, changed) = {
            let Some(mut doc) = col.records.get_mut(id) else {
                return Ok(UpdateOutcome::Missing);
            };
            if !matches_all(precondition, doc.value()) {
                return Ok(UpdateOutcome::PreconditionFailed(doc.value().clone()));
            }
            let changed = match doc.get_mut(field) {
                Some(Value::Array(items)) => {
                    if items.contains(&value) {
                        false
                    } else {
                        items.push(value);
                        true
                    }
                }
                None | Some(Value::Null) => {
                    doc.insert(field.to_string(), Value::Array(vec![value]));
                    true
                }
                Some(_) => {
                    return Err(AppError::validation(format!(
                        "Field '{field}' of {collection}/{id} is not an array"
                    )));
                }
            };
            (UpdateOutcome::Applied(doc.value().clone()), changed)
        };
        if changed {
            col.notify();
        }
        Ok(outcome)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> AppResult<i64> {
        let col = self.collection(collection);
        let next = {
            let mut doc = col.records.entry(id.to_string()).or_default();
            let current = match doc.get(field) {
                None | Some(Value::Null) => 0,
                Some(value) => value.as_i64().ok_or_else(|| {
                    AppError::validation(format!(
                        "Field '{field}' of {collection}/{id} is not an integer"
                    ))
                })?,
            };
            let next = current.saturating_add(delta);
            doc.insert(field.to_string(), Value::from(next));
            next
        };
        col.notify();
        Ok(next)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let col = self.collection(collection);
        let removed = col.records.remove(id).is_some();
        if removed {
            col.notify();
        }
        Ok(removed)
    }

    async fn subscribe(
        &self,
        collection: &str,
        filters: Vec<FilterField>,
    ) -> AppResult<SnapshotStream> {
        let col = self.collection(collection);
        // Subscribe before the first snapshot so no write falls in between.
        let state = Subscription {
            receiver: col.changes.subscribe(),
            collection: col,
            filters,
            last: None,
            started: false,
        };

        let snapshots = stream::unfold(state, |mut state| async move {
            loop {
                if state.started {
                    match state.receiver.recv().await {
                        Ok(()) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            debug!(skipped, "Change feed lagged, taking a fresh snapshot");
                        }
                        Err(RecvError::Closed) => return None,
                    }
                }
                state.started = true;

                let snapshot = state.collection.snapshot(&state.filters);
                if state.last.as_ref() != Some(&snapshot) {
                    state.last = Some(snapshot.clone());
                    return Some((Ok(snapshot), state));
                }
            }
        });

        Ok(snapshots.boxed())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// State carried between items of a live query.
struct Subscription {
    receiver: broadcast::Receiver<()>,
    collection: Collection,
    filters: Vec<FilterField>,
    /// Last emitted snapshot; unchanged snapshots are not re-emitted.
    last: Option<Vec<Document>>,
    started: bool,
}
