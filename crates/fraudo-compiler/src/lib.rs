//! Fraudo Compiler - binds parsed templates to a transaction domain
//!
//! Compilation resolves every field name against the domain's checked
//! fields and its [`fraudo_core::FieldResolver`], checks function arity and
//! argument types, and produces a [`CompiledTemplate`] the runtime can walk
//! without further validation.

pub mod compiled;
pub mod compiler;
pub mod error;

// Re-export main types
pub use compiled::{
    AggregateCall, CompiledRule, CompiledTemplate, ListKind, NumericExpr, OutcomeFilter,
    Predicate, StringSource,
};
pub use compiler::TemplateCompiler;
pub use error::{CompileError, Result};
