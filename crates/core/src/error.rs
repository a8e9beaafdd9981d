//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// One taxonomy shared by every service; the HTTP layer owns the mapping to
/// status codes. Deterministic business failures only; infrastructure detail
/// goes into `Internal` and is never shown to clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// Duplicate name/code or an illegal state transition (already in/out).
    #[error("{0}")]
    Conflict(String),

    /// A requested resource was not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing/invalid credentials or token.
    #[error("{0}")]
    Unauthenticated(String),

    /// The role policy denied the action.
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected storage/runtime failure. The message is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: &'static str) -> Self {
        Self::NotFound(what)
    }

    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::Unauthenticated(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
