use super::AggregateSource;
use crate::error::Result;
use crate::limiter::IoLimiter;
use crate::storage::EventRepository;
use fraudo_compiler::{AggregateCall, OutcomeFilter};
use fraudo_core::{Domain, FieldResolver};
use std::sync::Arc;

/// `count` and its outcome-filtered variants
pub struct CountAggregator<D: Domain> {
    source: AggregateSource<D>,
}

impl<D: Domain> CountAggregator<D> {
    pub fn new(
        resolver: Arc<dyn FieldResolver<D>>,
        repository: Arc<dyn EventRepository>,
        limiter: IoLimiter,
    ) -> Self {
        Self {
            source: AggregateSource {
                resolver,
                repository,
                limiter,
            },
        }
    }

    pub async fn count(&self, call: &AggregateCall<D::Field>, model: &D::Model) -> Result<i64> {
        self.evaluate(&OutcomeFilter::All, call, model).await
    }

    pub async fn count_success(
        &self,
        call: &AggregateCall<D::Field>,
        model: &D::Model,
    ) -> Result<i64> {
        self.evaluate(&OutcomeFilter::Success, call, model).await
    }

    pub async fn count_error(
        &self,
        call: &AggregateCall<D::Field>,
        model: &D::Model,
    ) -> Result<i64> {
        self.evaluate(&OutcomeFilter::Error { code: None }, call, model).await
    }

    pub async fn evaluate(
        &self,
        filter: &OutcomeFilter,
        call: &AggregateCall<D::Field>,
        model: &D::Model,
    ) -> Result<i64> {
        let Some(resolved) = self.source.resolve(call, model)? else {
            return Ok(0);
        };
        let repository = &self.source.repository;
        let (field, value) = (&resolved.field.name, &resolved.field.value);
        let (from, to) = (resolved.window.from, resolved.window.to);
        let group_by = &resolved.group_by;

        let count = self
            .source
            .limiter
            .run("count query", async {
                match filter {
                    OutcomeFilter::All if group_by.is_empty() => {
                        repository
                            .count_operation_by_field(field, value, from, to)
                            .await
                    }
                    OutcomeFilter::All => {
                        repository
                            .count_operation_by_field_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                    OutcomeFilter::Success => {
                        repository
                            .count_operation_success_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                    OutcomeFilter::Error { code } => {
                        repository
                            .count_operation_error_with_group_by(
                                field,
                                value,
                                from,
                                to,
                                code.as_deref(),
                                group_by,
                            )
                            .await
                    }
                    OutcomeFilter::Refund => {
                        repository
                            .count_refund_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                    OutcomeFilter::Chargeback => {
                        repository
                            .count_chargeback_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                }
            })
            .await?;

        tracing::debug!(
            "count({:?}) {}={} over [{}, {}] by {:?} = {}",
            filter,
            field,
            value,
            from,
            to,
            group_by,
            count
        );
        Ok(count)
    }
}
