//! Evaluation result types

use crate::error::ErrorKind;
use crate::storage::EventStatus;
use fraudo_core::Action;
use serde::{Deserialize, Serialize};

/// What a template evaluation came to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// First rule whose predicate held
    Matched { rule_id: String, action: Action },

    /// Every rule evaluated to false
    NoMatch,

    /// A predicate failed; later rules were not evaluated
    Error {
        rule_id: Option<String>,
        kind: ErrorKind,
        message: String,
    },

    /// The request deadline passed before the template finished
    Timeout,
}

/// One evaluated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTrace {
    pub rule_id: String,
    pub matched: bool,
}

/// Result of evaluating one template against one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub template_id: String,
    pub outcome: Outcome,

    /// Rules actually evaluated, in order
    #[serde(default)]
    pub trace: Vec<RuleTrace>,
}

impl EvaluationResult {
    pub fn timed_out(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            outcome: Outcome::Timeout,
            trace: Vec::new(),
        }
    }

    pub fn action(&self) -> Option<Action> {
        match &self.outcome {
            Outcome::Matched { action, .. } => Some(*action),
            _ => None,
        }
    }

    /// Id of the rule that matched or failed
    pub fn rule_id(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Matched { rule_id, .. } => Some(rule_id),
            Outcome::Error { rule_id, .. } => rule_id.as_deref(),
            _ => None,
        }
    }

    /// Kind of failure; the deadline counts as [`ErrorKind::Timeout`]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            Outcome::Error { kind, .. } => Some(*kind),
            Outcome::Timeout => Some(ErrorKind::Timeout),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error { .. } | Outcome::Timeout)
    }

    /// Status recorded in the historical store
    pub fn status(&self) -> EventStatus {
        match &self.outcome {
            Outcome::Matched { action, .. } => EventStatus::from(*action),
            Outcome::NoMatch => EventStatus::Normal,
            Outcome::Error { .. } | Outcome::Timeout => EventStatus::Error,
        }
    }
}
