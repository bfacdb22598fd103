//! Aggregate queries over the historical store

use super::event::{EventKind, EventStatus, HistoricalEvent};
use fraudo_core::FieldModel;
use std::collections::HashSet;

/// What an aggregate query computes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateKind {
    /// Number of matching events
    Count,
    /// Sum of matching event amounts
    Sum,
    /// Distinct non-empty values of a secondary attribute
    Unique { secondary: String },
}

/// A windowed aggregate over events sharing one attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    pub kind: AggregateKind,

    /// Primary equality filter
    pub field: FieldModel,

    /// Window start, epoch millis, inclusive
    pub from: i64,

    /// Window end, epoch millis, inclusive
    pub to: i64,

    /// Operations, refunds or chargebacks; never mixed
    pub event_kind: EventKind,

    /// Restrict to one outcome status
    pub status: Option<EventStatus>,

    /// Restrict to one error code
    pub error_code: Option<String>,

    /// Extra equality filters, ANDed
    pub constraints: Vec<FieldModel>,
}

/// Bound parameter of a generated statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl AggregateQuery {
    pub fn new(kind: AggregateKind, field: FieldModel, from: i64, to: i64) -> Self {
        Self {
            kind,
            field,
            from,
            to,
            event_kind: EventKind::Operation,
            status: None,
            error_code: None,
            constraints: Vec::new(),
        }
    }

    pub fn with_event_kind(mut self, event_kind: EventKind) -> Self {
        self.event_kind = event_kind;
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_error_code(mut self, code: Option<&str>) -> Self {
        self.error_code = code.map(str::to_string);
        self
    }

    pub fn with_constraints(mut self, constraints: &[FieldModel]) -> Self {
        self.constraints.extend_from_slice(constraints);
        self
    }

    /// Whether `event` falls inside the query's filters
    pub fn matches(&self, event: &HistoricalEvent) -> bool {
        event.timestamp >= self.from
            && event.timestamp <= self.to
            && event.attribute(&self.field.name) == Some(self.field.value.as_str())
            && event.kind == self.event_kind
            && self.status.map_or(true, |s| event.status == s)
            && self
                .error_code
                .as_deref()
                .map_or(true, |code| event.error_code.as_deref() == Some(code))
            && self
                .constraints
                .iter()
                .all(|c| event.attribute(&c.name) == Some(c.value.as_str()))
    }

    /// Compute the aggregate over an in-memory event slice
    pub fn apply<'a>(&self, events: impl IntoIterator<Item = &'a HistoricalEvent>) -> i64 {
        let matching = events.into_iter().filter(|e| self.matches(e));
        match &self.kind {
            AggregateKind::Count => matching.count() as i64,
            AggregateKind::Sum => matching.fold(0i64, |sum, e| sum.saturating_add(e.amount)),
            AggregateKind::Unique { secondary } => matching
                .filter_map(|e| e.attribute(secondary))
                .filter(|v| !v.is_empty())
                .collect::<HashSet<_>>()
                .len() as i64,
        }
    }

    /// Render as a single-scalar SELECT against `table`
    ///
    /// Attribute names and values are always bound, never inlined.
    pub fn to_sql(&self, table: &str) -> (String, Vec<SqlParam>) {
        let mut params = Vec::new();
        let mut bind = |param: SqlParam| {
            params.push(param);
            format!("${}", params.len())
        };

        let select = match &self.kind {
            AggregateKind::Count => "COUNT(*)".to_string(),
            AggregateKind::Sum => "COALESCE(SUM(amount), 0)::BIGINT".to_string(),
            AggregateKind::Unique { secondary } => format!(
                "COUNT(DISTINCT NULLIF(attributes ->> {}, ''))",
                bind(SqlParam::Text(secondary.clone()))
            ),
        };

        let mut conditions = vec![
            format!(
                "timestamp BETWEEN {} AND {}",
                bind(SqlParam::Int(self.from)),
                bind(SqlParam::Int(self.to))
            ),
            format!(
                "attributes ->> {} = {}",
                bind(SqlParam::Text(self.field.name.clone())),
                bind(SqlParam::Text(self.field.value.clone()))
            ),
            format!(
                "event_kind = {}",
                bind(SqlParam::Text(self.event_kind.as_str().to_string()))
            ),
        ];
        if let Some(status) = self.status {
            conditions.push(format!(
                "status = {}",
                bind(SqlParam::Text(status.as_str().to_string()))
            ));
        }
        if let Some(code) = &self.error_code {
            conditions.push(format!("error_code = {}", bind(SqlParam::Text(code.clone()))));
        }
        for constraint in &self.constraints {
            conditions.push(format!(
                "attributes ->> {} = {}",
                bind(SqlParam::Text(constraint.name.clone())),
                bind(SqlParam::Text(constraint.value.clone()))
            ));
        }

        let sql = format!(
            "SELECT {} FROM {} WHERE {}",
            select,
            table,
            conditions.join(" AND ")
        );
        (sql, params)
    }
}
