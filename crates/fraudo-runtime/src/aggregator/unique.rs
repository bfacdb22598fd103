use super::AggregateSource;
use crate::error::Result;
use crate::limiter::IoLimiter;
use crate::storage::EventRepository;
use fraudo_compiler::AggregateCall;
use fraudo_core::{Domain, FieldResolver};
use std::sync::Arc;

/// `unique(field, secondary, window, ...)`
pub struct UniqueValueAggregator<D: Domain> {
    source: AggregateSource<D>,
}

impl<D: Domain> UniqueValueAggregator<D> {
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

    /// Distinct `secondary` values among events sharing the primary value
    pub async fn unique_count(
        &self,
        secondary: D::Field,
        call: &AggregateCall<D::Field>,
        model: &D::Model,
    ) -> Result<i64> {
        let Some(resolved) = self.source.resolve(call, model)? else {
            return Ok(0);
        };
        let secondary = self.source.resolver.storage_name(secondary)?;
        let repository = &self.source.repository;
        let (field, value) = (&resolved.field.name, &resolved.field.value);
        let (from, to) = (resolved.window.from, resolved.window.to);
        let group_by = &resolved.group_by;

        let unique = self
            .source
            .limiter
            .run("unique query", async {
                if group_by.is_empty() {
                    repository
                        .uniq_count_operation(field, value, secondary, from, to)
                        .await
                } else {
                    repository
                        .uniq_count_operation_with_group_by(
                            field, value, secondary, from, to, group_by,
                        )
                        .await
                }
            })
            .await?;

        tracing::debug!(
            "unique({}) {}={} by {:?} = {}",
            secondary,
            field,
            value,
            group_by,
            unique
        );
        Ok(unique)
    }
}
