//! Record store trait for pluggable document storage backends.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::document::Document;
use crate::types::filter::FilterField;

/// A live sequence of query snapshots.
///
/// The first item is the current result; later items follow writes to the
/// collection. Dropping the stream ends the subscription.
pub type SnapshotStream = BoxStream<'static, AppResult<Vec<Document>>>;

/// Result of a conditional write.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The precondition held and the write was applied. Carries the new document.
    Applied(Document),
    /// The precondition did not hold. Carries the unchanged current document.
    PreconditionFailed(Document),
    /// No record exists under the id.
    Missing,
}

/// Trait for document-oriented record stores.
///
/// Records live in named collections and are keyed by a string id.
/// Implementations must apply `conditional_update`, `append_to_set`, and
/// `increment` atomically with respect to every other write on the same
/// record; this is what serializes competing lifecycle transitions.
#[async_trait]
pub trait RecordStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g., "memory").
    fn backend_name(&self) -> &str;

    /// Fetch a record by id.
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Document>>;

    /// Fetch every record matching all filters, in unspecified order.
    async fn query(&self, collection: &str, filters: &[FilterField]) -> AppResult<Vec<Document>>;

    /// Write a record, replacing any existing one (upsert).
    async fn set(&self, collection: &str, id: &str, doc: Document) -> AppResult<()>;

    /// Write a record only if no record exists under the id.
    ///
    /// Returns `false` and leaves the store unchanged if the id is taken.
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> AppResult<bool>;

    /// Merge `patch` into the record only if it matches every precondition.
    async fn conditional_update(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
        precondition: &[FilterField],
    ) -> AppResult<UpdateOutcome>;

    /// Add `value` to the array field `field` unless already present, only if
    /// the record matches every precondition.
    ///
    /// Adding a value that is already present counts as applied.
    async fn append_to_set(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        value: Value,
        precondition: &[FilterField],
    ) -> AppResult<UpdateOutcome>;

    /// Add `delta` to the integer field `field`, creating the record and the
    /// field if missing. Returns the new value.
    async fn increment(&self, collection: &str, id: &str, field: &str, delta: i64)
    -> AppResult<i64>;

    /// Delete a record. Returns `true` if a record was removed.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;

    /// Subscribe to the records of a collection matching all filters.
    async fn subscribe(
        &self,
        collection: &str,
        filters: Vec<FilterField>,
    ) -> AppResult<SnapshotStream>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
