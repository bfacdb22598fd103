//! Expression AST nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source position (1-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareOp {
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
}

impl CompareOp {
    /// Apply the operator to two numbers
    pub fn apply(&self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
        }
    }
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Numeric literal
    Number(f64),

    /// String literal
    String(String),

    /// Function call (e.g., `count("email", 60)`)
    Call {
        name: String,
        args: Vec<Expression>,
        position: Position,
    },

    /// Comparison between two operands
    Compare {
        left: Box<Expression>,
        op: CompareOp,
        right: Box<Expression>,
    },

    /// Logical AND
    And(Box<Expression>, Box<Expression>),

    /// Logical OR
    Or(Box<Expression>, Box<Expression>),

    /// Logical NOT
    Not(Box<Expression>),
}

impl Expression {
    /// Create a function call expression
    pub fn call(name: impl Into<String>, args: Vec<Expression>, position: Position) -> Self {
        Expression::Call {
            name: name.into(),
            args,
            position,
        }
    }

    /// Create a comparison expression
    pub fn compare(left: Expression, op: CompareOp, right: Expression) -> Self {
        Expression::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Expression::Or(Box::new(left), Box::new(right))
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Not(Box::new(operand))
    }

    /// String literal content, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expression::String(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_apply() {
        assert!(CompareOp::Gt.apply(3.0, 2.0));
        assert!(!CompareOp::Gt.apply(2.0, 2.0));
        assert!(CompareOp::Ge.apply(2.0, 2.0));
        assert!(CompareOp::Lt.apply(1.0, 2.0));
        assert!(CompareOp::Le.apply(2.0, 2.0));
        assert!(CompareOp::Eq.apply(5.0, 5.0));
        assert!(CompareOp::Ne.apply(5.0, 4.0));
    }

    #[test]
    fn test_builders() {
        let expr = Expression::and(
            Expression::compare(
                Expression::call("count", vec![], Position::new(1, 1)),
                CompareOp::Gt,
                Expression::Number(5.0),
            ),
            Expression::not(Expression::String("x".to_string())),
        );

        match expr {
            Expression::And(left, right) => {
                assert!(matches!(*left, Expression::Compare { op: CompareOp::Gt, .. }));
                assert!(matches!(*right, Expression::Not(_)));
            }
            _ => panic!("Expected And expression"),
        }
    }
}
