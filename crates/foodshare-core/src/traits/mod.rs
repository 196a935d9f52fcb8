//! Core traits defined in `foodshare-core` and implemented by other crates.

pub mod identity;
pub mod profile_mirror;
pub mod record_store;

pub use identity::IdentityProvider;
pub use profile_mirror::ProfileMirror;
pub use record_store::{RecordStore, SnapshotStream, UpdateOutcome};
