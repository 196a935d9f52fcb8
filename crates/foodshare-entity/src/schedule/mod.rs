//! Fulfillment schedule domain entities.

pub mod model;
pub mod payload;

pub use model::{FulfillmentSchedule, ScheduleDetails};
pub use payload::SchedulePayload;
