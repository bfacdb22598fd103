use super::AggregateSource;
use crate::error::Result;
use crate::limiter::IoLimiter;
use crate::storage::EventRepository;
use fraudo_compiler::{AggregateCall, OutcomeFilter};
use fraudo_core::{Domain, FieldResolver};
use std::sync::Arc;

/// `sum` and its outcome-filtered variants over event amounts
pub struct SumAggregator<D: Domain> {
    source: AggregateSource<D>,
}

impl<D: Domain> SumAggregator<D> {
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

    pub async fn sum(&self, call: &AggregateCall<D::Field>, model: &D::Model) -> Result<i64> {
        self.evaluate(&OutcomeFilter::All, call, model).await
    }

    pub async fn sum_success(
        &self,
        call: &AggregateCall<D::Field>,
        model: &D::Model,
    ) -> Result<i64> {
        self.evaluate(&OutcomeFilter::Success, call, model).await
    }

    pub async fn sum_error(&self, call: &AggregateCall<D::Field>, model: &D::Model) -> Result<i64> {
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

        let sum = self
            .source
            .limiter
            .run("sum query", async {
                match filter {
                    OutcomeFilter::All => {
                        repository
                            .sum_operation_by_field_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                    OutcomeFilter::Success => {
                        repository
                            .sum_operation_success_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                    OutcomeFilter::Error { code } => {
                        repository
                            .sum_operation_error_with_group_by(
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
                            .sum_refund_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                    OutcomeFilter::Chargeback => {
                        repository
                            .sum_chargeback_with_group_by(field, value, from, to, group_by)
                            .await
                    }
                }
            })
            .await?;

        tracing::debug!("sum({:?}) {}={} by {:?} = {}", filter, field, value, group_by, sum);
        Ok(sum)
    }
}
