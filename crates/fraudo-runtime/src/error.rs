//! Runtime error types

use fraudo_core::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Runtime error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Field has no model attribute or storage column in this domain
    #[error("{0}")]
    UnsupportedField(#[from] CoreError),

    /// List service could not be reached or answered with a failure
    #[error("List service unavailable: {0}")]
    ListServiceUnavailable(String),

    /// Geo-IP service could not be reached or answered with a failure
    #[error("Geo-IP service unavailable: {0}")]
    GeoServiceUnavailable(String),

    /// Historical store query or insert failed
    #[error("Aggregate query failed: {0}")]
    AggregateQuery(String),

    /// External call exceeded its time budget
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// The I/O limiter was shut down
    #[error("I/O limiter closed")]
    LimiterClosed,
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::UnsupportedField(_) => ErrorKind::UnsupportedField,
            RuntimeError::ListServiceUnavailable(_) => ErrorKind::ListServiceUnavailable,
            RuntimeError::GeoServiceUnavailable(_) => ErrorKind::GeoServiceUnavailable,
            RuntimeError::AggregateQuery(_) => ErrorKind::AggregateQuery,
            RuntimeError::Timeout { .. } => ErrorKind::Timeout,
            RuntimeError::LimiterClosed => ErrorKind::LimiterClosed,
        }
    }
}

/// Category of a [`RuntimeError`], kept on errored outcomes and recorded
/// as the error code of the stored event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedField,
    ListServiceUnavailable,
    GeoServiceUnavailable,
    AggregateQuery,
    Timeout,
    LimiterClosed,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedField => "unsupported_field",
            ErrorKind::ListServiceUnavailable => "list_service_unavailable",
            ErrorKind::GeoServiceUnavailable => "geo_service_unavailable",
            ErrorKind::AggregateQuery => "aggregate_query",
            ErrorKind::Timeout => "timeout",
            ErrorKind::LimiterClosed => "limiter_closed",
        }
    }

    /// Failures of an external collaborator that may clear on retry
    pub fn is_transient(&self) -> bool {
        !matches!(self, ErrorKind::UnsupportedField)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
