//! SDK error types

use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Template text does not parse
    #[error("Parser error: {0}")]
    ParseError(#[from] fraudo_parser::ParseError),

    /// Template does not compile for the engine's domain
    #[error("Compiler error: {0}")]
    CompileError(#[from] fraudo_compiler::CompileError),

    /// Runtime error
    #[error("Runtime error: {0}")]
    RuntimeError(#[from] fraudo_runtime::RuntimeError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Template file is not a valid template batch
    #[error("Invalid template file: {0}")]
    InvalidTemplateFile(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
