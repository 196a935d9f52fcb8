//! In-process collaborator implementations.

pub mod identity;
pub mod mirror;
pub mod store;

pub use identity::MemoryIdentityProvider;
pub use mirror::MemoryProfileMirror;
pub use store::MemoryRecordStore;
