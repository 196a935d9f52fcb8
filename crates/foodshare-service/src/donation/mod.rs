//! Donation lifecycle: the state machine and the operations that drive it.

pub mod request;
pub mod service;
pub mod transition;

pub use request::CreateDonationRequest;
pub use service::DonationService;
pub use transition::{AllowedActor, TRANSITIONS, TransitionRule};
