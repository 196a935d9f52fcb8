//! # foodshare-service
//!
//! Business logic service layer for FoodShare. The donation lifecycle engine
//! owns the status state machine; the scheduling, notification, stats, and
//! audit services handle the satellite records it writes, and the visibility
//! and inbox services serve the live read paths.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod audit;
pub mod context;
pub mod donation;
pub mod notification;
pub mod records;
pub mod schedule;
pub mod stats;
pub mod visibility;

pub use audit::AuditService;
pub use context::RequestContext;
pub use donation::{CreateDonationRequest, DonationService, TransitionRule};
pub use notification::{InboxService, NotificationService};
pub use records::Records;
pub use schedule::ScheduleService;
pub use stats::StatsService;
pub use visibility::VisibilityService;
