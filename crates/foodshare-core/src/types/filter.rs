//! Field filters for record store queries, preconditions, and subscriptions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::Document;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality. A missing field compares as `null`.
    Eq,
    /// Not equal.
    Ne,
    /// Array field contains the value.
    Contains,
    /// Array field does not contain the value. A missing field counts as empty.
    NotContains,
    /// Field is missing or `null`.
    IsNull,
    /// Field is present and not `null`.
    IsNotNull,
}

/// A single filter condition on a named top-level document field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against (ignored by the null checks).
    pub value: Value,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Shorthand for an inequality filter.
    pub fn ne(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Ne, value)
    }

    /// Shorthand for an array-contains filter.
    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::Contains, value)
    }

    /// Shorthand for an array-does-not-contain filter.
    pub fn not_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(field, FilterOp::NotContains, value)
    }

    /// Shorthand for a null check.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, Value::Null)
    }

    /// Evaluate this condition against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        let actual = doc.get(&self.field).unwrap_or(&Value::Null);
        match self.op {
            FilterOp::Eq => *actual == self.value,
            FilterOp::Ne => *actual != self.value,
            FilterOp::Contains => actual
                .as_array()
                .is_some_and(|items| items.contains(&self.value)),
            FilterOp::NotContains => !actual
                .as_array()
                .is_some_and(|items| items.contains(&self.value)),
            FilterOp::IsNull => actual.is_null(),
            FilterOp::IsNotNull => !actual.is_null(),
        }
    }
}

/// Whether a document satisfies every filter.
pub fn matches_all(filters: &[FilterField], doc: &Document) -> bool {
    filters.iter().all(|filter| filter.matches(doc))
}
