//! Compiler error types

use fraudo_core::{CoreError, Position};
use fraudo_parser::ParseError;
use thiserror::Error;

/// Compiler error
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    /// Template text does not parse
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Function name not part of the rule language
    #[error("Rule '{rule}': unknown function '{name}' at {position}")]
    UnknownFunction {
        rule: String,
        name: String,
        position: Position,
    },

    /// Function exists but not in this domain
    #[error("Rule '{rule}': function '{function}' is not available for {domain} templates")]
    UnsupportedFunction {
        rule: String,
        function: String,
        domain: &'static str,
    },

    /// Wrong number or kind of arguments
    #[error("Rule '{rule}': invalid arguments for '{function}' at {position}: {message}")]
    InvalidArguments {
        rule: String,
        function: String,
        position: Position,
        message: String,
    },

    /// Name is not a checked field of the domain
    #[error("Rule '{rule}': unknown field '{field}'")]
    UnknownField { rule: String, field: String },

    /// Field exists but the resolver has no mapping for it
    #[error("Rule '{rule}': {source}")]
    UnsupportedField { rule: String, source: CoreError },

    /// Numeric expression used as a condition or vice versa
    #[error("Rule '{rule}': type error: {message}")]
    TypeError { rule: String, message: String },

    /// Two rules share a name
    #[error("Duplicate rule name: {0}")]
    DuplicateRule(String),
}

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, CompileError>;
