//! Parser error types

use fraudo_core::Position;
use thiserror::Error;

/// Parser error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Character that cannot start any token
    #[error("Invalid character '{ch}' at {position}")]
    InvalidCharacter { ch: char, position: Position },

    /// String literal without closing quote
    #[error("Unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    /// Malformed number literal
    #[error("Invalid number '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },

    /// Token that does not fit the grammar
    #[error("Expected {expected}, found {found} at {position}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: Position,
    },

    /// Input ended early
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// Unknown rule action keyword
    #[error("Unknown action '{action}' at {position}")]
    UnknownAction { action: String, position: Position },

    /// Expression nested past the parser limit
    #[error("Expression nested deeper than {limit} levels at {position}")]
    NestingTooDeep { limit: usize, position: Position },
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;
