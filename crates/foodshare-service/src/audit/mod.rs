//! Audit logging of privileged and corrective actions.

pub mod service;

pub use service::AuditService;
