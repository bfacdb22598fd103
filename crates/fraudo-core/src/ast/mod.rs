//! Abstract Syntax Tree (AST) definitions for the Fraudo rule language
//!
//! The parser produces these untyped nodes; the compiler binds them to a
//! domain's checked fields and rejects anything malformed.

pub mod expression;
pub mod template;

pub use expression::{CompareOp, Expression, Position};
pub use template::{Action, RuleDef, RuleTemplate};
