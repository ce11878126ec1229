//! Error types for the result cache
//!
//! Provides unified error handling using thiserror. Every variant describes
//! an outcome the caller may treat as a plain cache miss; the variants exist
//! so that callers and monitoring can tell the cases apart.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::backend::BackendError;
use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store was unreachable at startup; the cache runs degraded
    #[error("Cache disabled: backing store unavailable at startup")]
    Disabled,

    /// Backing store could not be reached for this call
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),

    /// Backing store did not answer within the call budget
    #[error("Backing store timed out after {0:?}")]
    Timeout(Duration),

    /// Stored blob could not be decoded
    #[error("Corrupt cache entry {key}: {reason}")]
    CorruptEntry { key: String, reason: String },

    /// Entry could not be encoded or the store rejected the write
    #[error("Cache write failed: {0}")]
    WriteFailure(String),

    /// Invalid request data (admin API)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Error Kind ==
/// Coarse classification of a [`CacheError`], stable for matching and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Disabled,
    Unavailable,
    CorruptEntry,
    WriteFailure,
    InvalidRequest,
}

impl CacheError {
    /// Returns the taxonomy bucket of this error. Timeouts count as unavailability.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::Disabled => ErrorKind::Disabled,
            CacheError::Unavailable(_) | CacheError::Timeout(_) => ErrorKind::Unavailable,
            CacheError::CorruptEntry { .. } => ErrorKind::CorruptEntry,
            CacheError::WriteFailure(_) => ErrorKind::WriteFailure,
            CacheError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }
}

// == Backend Conversion ==
impl From<BackendError> for CacheError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout(after) => CacheError::Timeout(after),
            other => CacheError::Unavailable(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match self.kind() {
            ErrorKind::Disabled | ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::CorruptEntry | ErrorKind::WriteFailure => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
