//! Core type definitions used across the FoodShare workspace.

pub mod document;
pub mod filter;
pub mod id;
pub mod role;

pub use document::{Document, from_document, to_document};
pub use filter::{FilterField, FilterOp, matches_all};
pub use id::*;
pub use role::Role;
