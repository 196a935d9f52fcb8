//! # foodshare-entity
//!
//! Domain entity models for FoodShare. Every struct in this crate is either a
//! stored record (it carries a `COLLECTION` name) or a domain value object.
//! Stored records serialize with camelCase field names, which are the field
//! names the record store filters on.

pub mod audit;
pub mod donation;
pub mod notification;
pub mod schedule;
pub mod stats;

pub use foodshare_core::types::Role;
