//! Fraud engine facade

use crate::error::Result;
use crate::templates::TemplateSource;
use crate::validator::{CompiledBatch, TemplateValidator, ValidateTemplateResponse};
use fraudo_compiler::CompiledTemplate;
use fraudo_core::{Domain, FieldResolver};
use fraudo_runtime::{EvaluationResult, EventRepository, HistoricalEvent, RuleEvaluator};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;

/// Scores transactions of one domain against compiled templates
///
/// Built by [`crate::FraudEngineBuilder`]. Cheap to share behind an `Arc`;
/// concurrent requests are independent.
pub struct FraudEngine<D: Domain> {
    resolver: Arc<dyn FieldResolver<D>>,
    evaluator: RuleEvaluator<D>,
    validator: TemplateValidator<D>,
    repository: Arc<dyn EventRepository>,
    request_deadline: Duration,
}

impl<D: Domain> FraudEngine<D> {
    pub(crate) fn new(
        resolver: Arc<dyn FieldResolver<D>>,
        evaluator: RuleEvaluator<D>,
        repository: Arc<dyn EventRepository>,
        request_deadline: Duration,
    ) -> Self {
        Self {
            validator: TemplateValidator::new(resolver.clone()),
            resolver,
            evaluator,
            repository,
            request_deadline,
        }
    }

    /// Evaluate every template against `model`, results in template order
    ///
    /// Templates run concurrently. Templates still running when the request
    /// deadline passes are reported as timed out.
    pub async fn evaluate(
        &self,
        templates: &[CompiledTemplate<D::Field>],
        model: &D::Model,
    ) -> Vec<EvaluationResult> {
        let deadline = tokio::time::Instant::now() + self.request_deadline;

        join_all(templates.iter().map(|template| async move {
            match tokio::time::timeout_at(deadline, self.evaluator.evaluate(template, model)).await
            {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(
                        "Template '{}' exceeded the {:?} request deadline",
                        template.id,
                        self.request_deadline
                    );
                    EvaluationResult::timed_out(&template.id)
                }
            }
        }))
        .await
    }

    /// Evaluate several transactions concurrently, one result list per model
    pub async fn score_batch(
        &self,
        templates: &[CompiledTemplate<D::Field>],
        models: &[D::Model],
    ) -> Vec<Vec<EvaluationResult>> {
        join_all(models.iter().map(|model| self.evaluate(templates, model))).await
    }

    pub fn validate_templates(&self, templates: &[TemplateSource]) -> ValidateTemplateResponse {
        self.validator.validate(templates)
    }

    pub fn compile_templates(&self, templates: &[TemplateSource]) -> CompiledBatch<D> {
        self.validator.compile(templates)
    }

    /// Write one decision back to the historical store
    pub async fn record_decision(&self, model: &D::Model, result: &EvaluationResult) -> Result<()> {
        let event = HistoricalEvent::from_decision(self.resolver.as_ref(), model, result);
        self.repository.insert(event).await?;
        Ok(())
    }

    /// Write every decision for `model` in one batch
    pub async fn record_decisions(
        &self,
        model: &D::Model,
        results: &[EvaluationResult],
    ) -> Result<()> {
        let events = results
            .iter()
            .map(|result| HistoricalEvent::from_decision(self.resolver.as_ref(), model, result))
            .collect();
        self.repository.insert_batch(events).await?;
        Ok(())
    }

    /// Write an event that did not come from scoring, such as a refund or
    /// a chargeback reported later
    pub async fn record_event(&self, event: HistoricalEvent) -> Result<()> {
        tracing::debug!(
            "Recording {} event for template '{}'",
            event.kind,
            event.template_id
        );
        self.repository.insert(event).await?;
        Ok(())
    }

    pub fn repository(&self) -> &Arc<dyn EventRepository> {
        &self.repository
    }
}
