//! Typed, timeout-bounded access to the record store.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use foodshare_core::config::StoreConfig;
use foodshare_core::error::AppError;
use foodshare_core::result::AppResult;
use foodshare_core::traits::record_store::{RecordStore, UpdateOutcome};
use foodshare_core::types::{Document, FilterField, from_document, to_document};

/// A live sequence of typed query snapshots.
pub type TypedSnapshots<T> = BoxStream<'static, AppResult<Vec<T>>>;

/// Record store handle shared by all services.
///
/// Every call is bounded by the configured operation timeout; expiry maps to
/// `StoreUnavailable`. Errors returned by the store itself pass through
/// unchanged.
#[derive(Debug, Clone)]
pub struct Records {
    /// The backing store.
    store: Arc<dyn RecordStore>,
    /// Upper bound for a single call.
    timeout: Duration,
}

impl Records {
    /// Creates a new record handle.
    pub fn new(store: Arc<dyn RecordStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            timeout: config.operation_timeout(),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        collection: &str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    collection,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Record store call timed out"
                );
                Err(AppError::store_unavailable(format!(
                    "Record store did not answer '{operation}' on {collection} within {} ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }

    /// Fetch a raw document.
    pub async fn get_raw(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        self.bounded("get", collection, self.store.get(collection, id))
            .await
    }

    /// Fetch and decode a record.
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> AppResult<Option<T>> {
        self.get_raw(collection, id)
            .await?
            .map(from_document)
            .transpose()
    }

    /// Fetch and decode every record matching `filters`.
    pub async fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        filters: &[FilterField],
    ) -> AppResult<Vec<T>> {
        self.bounded("query", collection, self.store.query(collection, filters))
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    /// Encode and upsert a record.
    pub async fn set<T: Serialize>(&self, collection: &str, id: &str, record: &T) -> AppResult<()> {
        let doc = to_document(record)?;
        self.bounded("set", collection, self.store.set(collection, id, doc))
            .await
    }

    /// Encode and create a record if the id is free.
    pub async fn insert<T: Serialize>(
        &self,
        collection: &str,
        id: &str,
        record: &T,
    ) -> AppResult<bool> {
        let doc = to_document(record)?;
        self.bounded("insert", collection, self.store.insert(collection, id, doc))
            .await
    }

    /// Merge `patch` into a record if it matches `precondition`.
    pub async fn conditional_update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
        precondition: &[FilterField],
    ) -> AppResult<UpdateOutcome> {
        self.bounded(
            "conditional_update",
            collection,
            self.store
                .conditional_update(collection, id, patch, precondition),
        )
        .await
    }

    /// Add a value to an array field if the record matches `precondition`.
    pub async fn append_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
        precondition: &[FilterField],
    ) -> AppResult<UpdateOutcome> {
        self.bounded(
            "append_to_set",
            collection,
            self.store
                .append_to_set(collection, id, field, value, precondition),
        )
        .await
    }

    /// Delete a record.
    pub async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        self.bounded("delete", collection, self.store.delete(collection, id))
            .await
    }

    /// Subscribe to decoded snapshots of the records matching `filters`.
    ///
    /// Only opening the subscription is time-bounded; the stream itself is
    /// open-ended.
    pub async fn subscribe<T>(
        &self,
        collection: &str,
        filters: Vec<FilterField>,
    ) -> AppResult<TypedSnapshots<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let snapshots = self
            .bounded(
                "subscribe",
                collection,
                self.store.subscribe(collection, filters),
            )
            .await?;
        Ok(snapshots
            .map(|snapshot| -> AppResult<Vec<T>> {
                snapshot.and_then(|docs| docs.into_iter().map(from_document).collect())
            })
            .boxed())
    }
}
