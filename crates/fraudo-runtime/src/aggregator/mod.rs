//! Windowed aggregates over the historical store
//!
//! Aggregators turn a compiled aggregate call into a repository query: the
//! primary field and every group-by field are resolved from the model, the
//! window is anchored at the current time, and the call goes through the
//! shared [`IoLimiter`].

mod count;
mod sum;
mod unique;

pub use count::CountAggregator;
pub use sum::SumAggregator;
pub use unique::UniqueValueAggregator;

use crate::error::Result;
use crate::limiter::IoLimiter;
use crate::storage::EventRepository;
use fraudo_compiler::AggregateCall;
use fraudo_core::{Domain, FieldModel, FieldResolver};
use std::sync::Arc;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Closed interval of epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    /// `[now - minutes, now]`
    pub fn ending_at(now: i64, minutes: u64) -> Self {
        let span = i64::try_from(minutes)
            .unwrap_or(i64::MAX)
            .saturating_mul(MILLIS_PER_MINUTE);
        Self {
            from: now.saturating_sub(span),
            to: now,
        }
    }

    /// Window ending at the current wall-clock time
    pub fn ending_now(minutes: u64) -> Self {
        Self::ending_at(chrono::Utc::now().timestamp_millis(), minutes)
    }
}

/// Inputs of one repository query, resolved from the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub field: FieldModel,
    pub group_by: Vec<FieldModel>,
    pub window: TimeWindow,
}

/// Plumbing shared by the aggregators
pub(crate) struct AggregateSource<D: Domain> {
    pub resolver: Arc<dyn FieldResolver<D>>,
    pub repository: Arc<dyn EventRepository>,
    pub limiter: IoLimiter,
}

impl<D: Domain> AggregateSource<D> {
    /// Resolve the call against `model`
    ///
    /// Returns `None` when the primary value is empty: an absent attribute
    /// has no history, so the aggregate is zero without a query.
    pub fn resolve(
        &self,
        call: &AggregateCall<D::Field>,
        model: &D::Model,
    ) -> Result<Option<Resolved>> {
        let field = self.resolver.resolve(call.field, model)?;
        if field.is_empty() {
            return Ok(None);
        }
        let group_by = self.resolver.resolve_all(&call.group_by, model)?;

        Ok(Some(Resolved {
            field,
            group_by,
            window: TimeWindow::ending_now(call.window_minutes),
        }))
    }
}
