//! Donor impact statistics.

pub mod model;

pub use model::{DonorCredit, DonorStats};
