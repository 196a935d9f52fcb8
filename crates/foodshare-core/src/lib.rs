//! # foodshare-core
//!
//! Core crate for FoodShare. Contains the collaborator traits (record store,
//! identity provider, profile mirror), configuration schemas, typed
//! identifiers, domain events, document filters, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other FoodShare crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
