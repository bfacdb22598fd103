//! Historical event store
//!
//! Scored transactions are written back as [`HistoricalEvent`]s and read
//! through windowed aggregate queries. Implementations only need to provide
//! [`EventRepository::aggregate`] and the inserts; the named query methods
//! build the matching [`AggregateQuery`].

mod event;
mod memory;
#[cfg(feature = "sqlx")]
mod postgres;
mod query;

pub use event::{EventKind, EventStatus, HistoricalEvent};
pub use memory::InMemoryEventRepository;
#[cfg(feature = "sqlx")]
pub use postgres::PostgresEventRepository;
pub use query::{AggregateKind, AggregateQuery, SqlParam};

use crate::error::Result;
use async_trait::async_trait;
use fraudo_core::FieldModel;

/// Storage of scored transactions
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: HistoricalEvent) -> Result<()>;

    /// Insert all events or none
    async fn insert_batch(&self, events: Vec<HistoricalEvent>) -> Result<()>;

    /// Evaluate one aggregate query
    async fn aggregate(&self, query: AggregateQuery) -> Result<i64>;

    async fn count_operation_by_field(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
    ) -> Result<i64> {
        self.aggregate(AggregateQuery::new(
            AggregateKind::Count,
            FieldModel::new(field, value),
            from,
            to,
        ))
        .await
    }

    async fn count_operation_by_field_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Count, FieldModel::new(field, value), from, to)
                .with_constraints(constraints),
        )
        .await
    }

    /// Count of accepted events
    async fn count_operation_success_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Count, FieldModel::new(field, value), from, to)
                .with_status(EventStatus::Accept)
                .with_constraints(constraints),
        )
        .await
    }

    /// Count of failed events, optionally with one error code
    async fn count_operation_error_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        error_code: Option<&str>,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Count, FieldModel::new(field, value), from, to)
                .with_status(EventStatus::Error)
                .with_error_code(error_code)
                .with_constraints(constraints),
        )
        .await
    }

    /// Count of settled refunds
    async fn count_refund_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Count, FieldModel::new(field, value), from, to)
                .with_event_kind(EventKind::Refund)
                .with_status(EventStatus::Accept)
                .with_constraints(constraints),
        )
        .await
    }

    /// Count of settled chargebacks
    async fn count_chargeback_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Count, FieldModel::new(field, value), from, to)
                .with_event_kind(EventKind::Chargeback)
                .with_status(EventStatus::Accept)
                .with_constraints(constraints),
        )
        .await
    }

    async fn sum_operation_by_field_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Sum, FieldModel::new(field, value), from, to)
                .with_constraints(constraints),
        )
        .await
    }

    async fn sum_operation_success_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Sum, FieldModel::new(field, value), from, to)
                .with_status(EventStatus::Accept)
                .with_constraints(constraints),
        )
        .await
    }

    async fn sum_operation_error_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        error_code: Option<&str>,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Sum, FieldModel::new(field, value), from, to)
                .with_status(EventStatus::Error)
                .with_error_code(error_code)
                .with_constraints(constraints),
        )
        .await
    }

    async fn sum_refund_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Sum, FieldModel::new(field, value), from, to)
                .with_event_kind(EventKind::Refund)
                .with_status(EventStatus::Accept)
                .with_constraints(constraints),
        )
        .await
    }

    async fn sum_chargeback_with_group_by(
        &self,
        field: &str,
        value: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(AggregateKind::Sum, FieldModel::new(field, value), from, to)
                .with_event_kind(EventKind::Chargeback)
                .with_status(EventStatus::Accept)
                .with_constraints(constraints),
        )
        .await
    }

    /// Distinct values of `secondary` among events with `field = value`
    async fn uniq_count_operation(
        &self,
        field: &str,
        value: &str,
        secondary: &str,
        from: i64,
        to: i64,
    ) -> Result<i64> {
        self.uniq_count_operation_with_group_by(field, value, secondary, from, to, &[])
            .await
    }

    async fn uniq_count_operation_with_group_by(
        &self,
        field: &str,
        value: &str,
        secondary: &str,
        from: i64,
        to: i64,
        constraints: &[FieldModel],
    ) -> Result<i64> {
        self.aggregate(
            AggregateQuery::new(
                AggregateKind::Unique {
                    secondary: secondary.to_string(),
                },
                FieldModel::new(field, value),
                from,
                to,
            )
            .with_constraints(constraints),
        )
        .await
    }
}
