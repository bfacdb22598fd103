//! First-match rule evaluation

use crate::aggregator::{CountAggregator, SumAggregator, UniqueValueAggregator};
use crate::error::Result;
use crate::geo::{CountryResolver, GeoFailurePolicy, GeoIpService};
use crate::limiter::IoLimiter;
use crate::lists::{InListFinder, ListService};
use crate::result::{EvaluationResult, Outcome, RuleTrace};
use crate::storage::EventRepository;
use fraudo_compiler::{CompiledTemplate, NumericExpr, Predicate, StringSource};
use fraudo_core::{Domain, FieldResolver};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;

/// Evaluates compiled templates against transactions of one domain
///
/// Stateless apart from its shared collaborators; one instance serves every
/// concurrent evaluation.
pub struct RuleEvaluator<D: Domain> {
    resolver: Arc<dyn FieldResolver<D>>,
    counts: CountAggregator<D>,
    sums: SumAggregator<D>,
    uniques: UniqueValueAggregator<D>,
    countries: CountryResolver<D>,
    lists: InListFinder<D>,
}

impl<D: Domain> RuleEvaluator<D> {
    pub fn new(
        resolver: Arc<dyn FieldResolver<D>>,
        repository: Arc<dyn EventRepository>,
        list_service: Arc<dyn ListService>,
        geo_service: Arc<dyn GeoIpService>,
        limiter: IoLimiter,
        geo_policy: GeoFailurePolicy,
    ) -> Self {
        Self {
            counts: CountAggregator::new(resolver.clone(), repository.clone(), limiter.clone()),
            sums: SumAggregator::new(resolver.clone(), repository.clone(), limiter.clone()),
            uniques: UniqueValueAggregator::new(resolver.clone(), repository, limiter.clone()),
            countries: CountryResolver::new(
                resolver.clone(),
                geo_service,
                limiter.clone(),
                geo_policy,
            ),
            lists: InListFinder::new(resolver.clone(), list_service, limiter),
            resolver,
        }
    }

    /// Evaluate `template` against `model`
    ///
    /// Rules run in declaration order and the first one that holds decides.
    /// A failing predicate stops the template with an error naming the rule.
    pub async fn evaluate(
        &self,
        template: &CompiledTemplate<D::Field>,
        model: &D::Model,
    ) -> EvaluationResult {
        let mut trace = Vec::with_capacity(template.rules.len());

        for rule in &template.rules {
            match self.predicate(&rule.predicate, model).await {
                Ok(matched) => {
                    trace.push(RuleTrace {
                        rule_id: rule.id.clone(),
                        matched,
                    });
                    if matched {
                        tracing::debug!(
                            "Template '{}' matched rule '{}' -> {}",
                            template.id,
                            rule.id,
                            rule.action
                        );
                        return EvaluationResult {
                            template_id: template.id.clone(),
                            outcome: Outcome::Matched {
                                rule_id: rule.id.clone(),
                                action: rule.action,
                            },
                            trace,
                        };
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        "Template '{}' failed at rule '{}': {}",
                        template.id,
                        rule.id,
                        e
                    );
                    return EvaluationResult {
                        template_id: template.id.clone(),
                        outcome: Outcome::Error {
                            rule_id: Some(rule.id.clone()),
                            kind: e.kind(),
                            message: e.to_string(),
                        },
                        trace,
                    };
                }
            }
        }

        EvaluationResult {
            template_id: template.id.clone(),
            outcome: Outcome::NoMatch,
            trace,
        }
    }

    fn predicate<'a>(
        &'a self,
        predicate: &'a Predicate<D::Field>,
        model: &'a D::Model,
    ) -> BoxFuture<'a, Result<bool>> {
        async move {
            match predicate {
                Predicate::And(left, right) => {
                    Ok(self.predicate(left, model).await? && self.predicate(right, model).await?)
                }
                Predicate::Or(left, right) => {
                    Ok(self.predicate(left, model).await? || self.predicate(right, model).await?)
                }
                Predicate::Not(inner) => Ok(!self.predicate(inner, model).await?),
                Predicate::Compare { left, op, right } => {
                    let left = self.numeric(left, model).await?;
                    let right = self.numeric(right, model).await?;
                    Ok(op.apply(left, right))
                }
                Predicate::In { source, candidates } => {
                    let value = match source {
                        StringSource::Field(field) => self.resolver.resolve(*field, model)?.value,
                        StringSource::Country(field) => {
                            self.countries.resolve(*field, model).await?
                        }
                    };
                    Ok(candidates.iter().any(|c| *c == value))
                }
                Predicate::Equals { field, value } => {
                    Ok(self.resolver.resolve(*field, model)?.value == *value)
                }
                Predicate::Like { field, pattern } => {
                    Ok(pattern.is_match(&self.resolver.resolve(*field, model)?.value))
                }
                Predicate::InList { list, fields } => {
                    self.lists.is_in_list(list, fields, model).await
                }
            }
        }
        .boxed()
    }

    async fn numeric(&self, expr: &NumericExpr<D::Field>, model: &D::Model) -> Result<f64> {
        let value = match expr {
            NumericExpr::Literal(n) => return Ok(*n),
            NumericExpr::Amount => D::amount(model),
            NumericExpr::Count { filter, call } => {
                self.counts.evaluate(filter, call, model).await?
            }
            NumericExpr::Sum { filter, call } => self.sums.evaluate(filter, call, model).await?,
            NumericExpr::Unique { secondary, call } => {
                self.uniques.unique_count(*secondary, call, model).await?
            }
        };
        Ok(value as f64)
    }
}
