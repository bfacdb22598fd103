//! Compiled template representation
//!
//! Typed counterpart of the AST: every field is a domain checked field,
//! every function call has been checked for arity, and numeric and boolean
//! positions can no longer be confused.

use fraudo_core::{Action, CheckedField, CompareOp};
use regex::Regex;

/// Outcome restriction of a count or sum aggregate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeFilter {
    /// Every recorded operation
    All,
    /// Only operations recorded as accepted
    Success,
    /// Only failed operations, optionally with one error code
    Error { code: Option<String> },
    /// Settled refunds
    Refund,
    /// Settled chargebacks
    Chargeback,
}

impl OutcomeFilter {
    /// Filters that read refund or chargeback history
    pub fn is_refund(&self) -> bool {
        matches!(self, OutcomeFilter::Refund | OutcomeFilter::Chargeback)
    }
}

/// Arguments shared by every aggregate call
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall<F> {
    /// Primary field the history is filtered on
    pub field: F,
    /// Trailing window length
    pub window_minutes: u64,
    /// Extra equality constraints, resolved from the model at evaluation
    pub group_by: Vec<F>,
}

/// Expression producing a number
#[derive(Debug, Clone, PartialEq)]
pub enum NumericExpr<F> {
    Literal(f64),
    /// `amount()`
    Amount,
    Count {
        filter: OutcomeFilter,
        call: AggregateCall<F>,
    },
    Sum {
        filter: OutcomeFilter,
        call: AggregateCall<F>,
    },
    /// `unique(field, secondary, window, ...)`
    Unique {
        secondary: F,
        call: AggregateCall<F>,
    },
}

/// List a membership predicate checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
    White,
    Black,
    Grey,
    /// `inList("name", ...)`: composite key over all fields
    Named(String),
}

impl ListKind {
    /// List identifier sent to the list service
    pub fn list_id(&self) -> &str {
        match self {
            ListKind::White => "white",
            ListKind::Black => "black",
            ListKind::Grey => "grey",
            ListKind::Named(name) => name,
        }
    }
}

/// Source of the string tested by `in(...)`
#[derive(Debug, Clone, PartialEq)]
pub enum StringSource<F> {
    Field(F),
    /// `countryBy(field)`
    Country(F),
}

/// Boolean predicate tree
#[derive(Debug, Clone)]
pub enum Predicate<F> {
    And(Box<Predicate<F>>, Box<Predicate<F>>),
    Or(Box<Predicate<F>>, Box<Predicate<F>>),
    Not(Box<Predicate<F>>),
    Compare {
        left: NumericExpr<F>,
        op: CompareOp,
        right: NumericExpr<F>,
    },
    In {
        source: StringSource<F>,
        candidates: Vec<String>,
    },
    Equals {
        field: F,
        value: String,
    },
    /// Anchored regex match on a field value
    Like {
        field: F,
        pattern: Regex,
    },
    InList {
        list: ListKind,
        fields: Vec<F>,
    },
}

/// One compiled rule
#[derive(Debug, Clone)]
pub struct CompiledRule<F> {
    pub id: String,
    pub predicate: Predicate<F>,
    pub action: Action,
}

/// Compiled template, rules in declaration order
#[derive(Debug, Clone)]
pub struct CompiledTemplate<F: CheckedField> {
    pub id: String,
    pub rules: Vec<CompiledRule<F>>,
}

impl<F: CheckedField> CompiledTemplate<F> {
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }
}
