//! Donation domain entities.

pub mod category;
pub mod method;
pub mod model;
pub mod status;
pub mod transfer;

pub use category::{FoodCategory, ImpactType};
pub use method::DonationMethod;
pub use model::Donation;
pub use status::DonationStatus;
pub use transfer::TransferableFields;
