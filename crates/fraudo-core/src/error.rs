//! Error types for Fraudo Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// The checked field has no mapping in this domain
    #[error("Unsupported field '{field}' for {domain} domain")]
    UnsupportedField { domain: &'static str, field: String },

    /// The name does not denote any checked field of the domain
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

impl CoreError {
    pub fn unsupported(domain: &'static str, field: impl ToString) -> Self {
        CoreError::UnsupportedField {
            domain,
            field: field.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
