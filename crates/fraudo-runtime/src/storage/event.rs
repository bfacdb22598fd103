//! Historical event records

use crate::result::EvaluationResult;
use fraudo_core::{Action, CheckedField, Domain, FieldResolver};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Outcome status stored with each event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Accept,
    Decline,
    Notify,
    /// No rule matched
    Normal,
    /// Evaluation failed or timed out
    Error,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Accept => "accept",
            EventStatus::Decline => "decline",
            EventStatus::Notify => "notify",
            EventStatus::Normal => "normal",
            EventStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "accept" => Some(EventStatus::Accept),
            "decline" => Some(EventStatus::Decline),
            "notify" => Some(EventStatus::Notify),
            "normal" => Some(EventStatus::Normal),
            "error" => Some(EventStatus::Error),
            _ => None,
        }
    }
}

impl From<Action> for EventStatus {
    fn from(action: Action) -> Self {
        match action {
            Action::Accept => EventStatus::Accept,
            Action::Decline => EventStatus::Decline,
            Action::Notify => EventStatus::Notify,
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to the money
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A scored payment or transfer
    #[default]
    Operation,
    Refund,
    Chargeback,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Operation => "operation",
            EventKind::Refund => "refund",
            EventKind::Chargeback => "chargeback",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored transaction, append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEvent {
    pub id: Uuid,

    /// Epoch milliseconds
    pub timestamp: i64,

    pub template_id: String,

    /// Rule that matched or failed, if any
    pub rule_id: Option<String>,

    #[serde(default)]
    pub kind: EventKind,

    pub status: EventStatus,

    /// Failure code of an errored event
    #[serde(default)]
    pub error_code: Option<String>,

    /// Amount in minor units
    pub amount: i64,

    /// Non-empty attributes keyed by storage name
    pub attributes: BTreeMap<String, String>,
}

impl HistoricalEvent {
    /// New event stamped with the current time
    pub fn new(template_id: impl Into<String>, status: EventStatus, amount: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            template_id: template_id.into(),
            rule_id: None,
            kind: EventKind::Operation,
            status,
            error_code: None,
            amount,
            attributes: BTreeMap::new(),
        }
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Event for one decision on `model`
    ///
    /// Every field the resolver maps is stored under its storage name;
    /// empty values and unmapped fields are left out.
    pub fn from_decision<D: Domain>(
        resolver: &dyn FieldResolver<D>,
        model: &D::Model,
        result: &EvaluationResult,
    ) -> Self {
        let mut event = Self::new(&result.template_id, result.status(), D::amount(model));
        event.rule_id = result.rule_id().map(str::to_string);
        event.error_code = result.error_kind().map(|kind| kind.as_str().to_string());

        for field in D::Field::all() {
            if let Ok(resolved) = resolver.resolve(*field, model) {
                if !resolved.is_empty() {
                    event.attributes.insert(resolved.name, resolved.value);
                }
            }
        }
        event
    }
}
