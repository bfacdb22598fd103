//! Fraudo Core - Core types and definitions for the Fraudo decision engine
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Transaction domains (payment, P2P) and their checked fields
//! - Transaction models and resolved field values
//! - AST definitions for the rule language
//! - The field resolver contract
//! - Error types

pub mod ast;
pub mod domain;
pub mod error;
pub mod field;
pub mod model;
pub mod resolver;

// Re-export commonly used types
pub use ast::{Action, CompareOp, Expression, Position, RuleDef, RuleTemplate};
pub use domain::{Domain, Payment, P2P};
pub use error::{CoreError, Result};
pub use field::{CheckedField, GeoDimension, P2PCheckedField, PaymentCheckedField};
pub use model::{FieldModel, P2PModel, PaymentModel};
pub use resolver::FieldResolver;
