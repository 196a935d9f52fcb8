//! Unified application error types for FoodShare.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] is what callers
//! branch on: a UI refreshes its list on [`ErrorKind::AlreadyClaimed`] but
//! retries with backoff on [`ErrorKind::StoreUnavailable`].

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Input had the wrong shape or range. Fixed by correcting the input.
    Validation,
    /// The requested status change is not an edge of the lifecycle table.
    InvalidTransition,
    /// The caller's identity or role may not perform the action.
    Forbidden,
    /// Another NGO accepted the donation first.
    AlreadyClaimed,
    /// The requested record does not exist.
    NotFound,
    /// The record store timed out or could not be reached.
    StoreUnavailable,
    /// A stored record lacks fields required to copy it.
    MissingFields,
    /// A record with the same key already exists.
    Conflict,
    /// A document could not be encoded or decoded.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl ErrorKind {
    /// Whether a blind retry of the same call is safe and may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable)
    }

    /// A short sentence the UI layer can show for this kind of failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation => "Please check the highlighted fields and try again.",
            Self::InvalidTransition => "This donation is no longer in a state that allows this action.",
            Self::Forbidden => "You are not allowed to perform this action.",
            Self::AlreadyClaimed => "Another organisation has already accepted this donation.",
            Self::NotFound => "This donation could not be found.",
            Self::StoreUnavailable => "We could not reach the server. Please try again.",
            Self::MissingFields => "This donation is missing details and cannot be donated again.",
            Self::Conflict => "This record already exists.",
            Self::Serialization => "The stored data could not be read.",
            Self::Configuration => "The application is misconfigured.",
            Self::Internal => "Something went wrong.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::InvalidTransition => write!(f, "INVALID_TRANSITION"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::AlreadyClaimed => write!(f, "ALREADY_CLAIMED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::StoreUnavailable => write!(f, "STORE_UNAVAILABLE"),
            Self::MissingFields => write!(f, "MISSING_FIELDS"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout FoodShare.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an invalid-transition error.
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTransition, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create an already-claimed error.
    pub fn already_claimed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AlreadyClaimed, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a store-unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StoreUnavailable, message)
    }

    /// Create a missing-fields error.
    pub fn missing_fields(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingFields, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::with_source(ErrorKind::Validation, format!("Invalid input: {err}"), err)
    }
}
