//! Rule template AST definitions

use super::expression::{Expression, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action a matching rule emits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Accept,
    Decline,
    Notify,
}

impl Action {
    /// Parse the rule-text keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "accept" => Some(Action::Accept),
            "decline" => Some(Action::Decline),
            "notify" => Some(Action::Notify),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accept => "accept",
            Action::Decline => "decline",
            Action::Notify => "notify",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `rule: [name:] condition -> action;` definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDef {
    /// Optional rule name
    pub name: Option<String>,

    pub condition: Expression,

    pub action: Action,

    /// Position of the `rule` keyword
    pub position: Position,
}

impl RuleDef {
    /// Rule identifier: its name, or its 1-based position in the template
    pub fn id(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => (index + 1).to_string(),
        }
    }
}

/// Parsed rule template: rules in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleTemplate {
    pub rules: Vec<RuleDef>,
}

impl RuleTemplate {
    pub fn new(rules: Vec<RuleDef>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
