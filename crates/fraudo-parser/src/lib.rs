//! Fraudo Parser - rule text to AST parser for the Fraudo decision engine
//!
//! Turns template source such as
//!
//! ```text
//! rule: black: inBlackList("email", "card_token") -> decline;
//! rule: count("card_token", 1440, "party_id") > 1 -> notify;
//! ```
//!
//! into a [`fraudo_core::RuleTemplate`].

pub mod error;
pub mod lexer;
pub mod template_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use lexer::{Lexer, Token, TokenKind};
pub use template_parser::{TemplateParser, MAX_NESTING};
