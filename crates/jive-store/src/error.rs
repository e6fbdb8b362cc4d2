//! Typed error surface for the store adapter.

use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`crate::StoreAdapter`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store is transiently unreachable; the caller may retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// No row matched the given primary key or filter.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness or referential constraint was violated.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The request failed schema or argument validation before reaching the store.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization between the row representation and the Arrow column layout failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<lancedb::Error> for StoreError {
    fn from(err: lancedb::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

impl From<arrow_schema::ArrowError> for StoreError {
    fn from(err: arrow_schema::ArrowError) -> Self {
        Self::Serialization(err.to_string())
    }
}
