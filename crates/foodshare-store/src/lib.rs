//! # foodshare-store
//!
//! Collaborator implementations for FoodShare that run inside the process:
//!
//! - **record store**: document collections on [dashmap](https://crates.io/crates/dashmap)
//!   with a per-collection change feed for live queries
//! - **identity**: a role registry with a signed-in caller
//! - **profile mirror**: donor stats mirrored in a [moka](https://crates.io/crates/moka) cache
//!
//! Hosted backends implement the same traits from `foodshare-core`.

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::{MemoryIdentityProvider, MemoryProfileMirror, MemoryRecordStore};
