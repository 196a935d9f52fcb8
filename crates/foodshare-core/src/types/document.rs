//! Schemaless documents as held by the record store.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::AppError;
use crate::result::AppResult;

/// A stored record: a JSON object keyed by field name.
pub type Document = serde_json::Map<String, Value>;

/// Encode a typed record into a document.
pub fn to_document<T: Serialize>(value: &T) -> AppResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::internal(format!(
            "Expected a JSON object, got {other}"
        ))),
    }
}

/// Decode a document into a typed record.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> AppResult<T> {
    Ok(serde_json::from_value(Value::Object(doc))?)
}
