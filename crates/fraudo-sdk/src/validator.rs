//! Template batch validation
//!
//! Every template of a batch is parsed and compiled on its own with the
//! engine's field resolver. A broken template adds one entry to the error
//! list and never stops the rest of the batch.

use crate::templates::TemplateSource;
use fraudo_compiler::{CompiledTemplate, TemplateCompiler};
use fraudo_core::{Domain, FieldResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Compilation failure of one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateError {
    pub id: String,
    pub message: String,
}

/// Errors of a validated batch; empty when every template compiled
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateTemplateResponse {
    pub errors: Vec<TemplateError>,
}

impl ValidateTemplateResponse {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiled templates of a batch together with the ones that failed
#[derive(Debug, Clone)]
pub struct CompiledBatch<D: Domain> {
    pub templates: Vec<CompiledTemplate<D::Field>>,
    pub errors: Vec<TemplateError>,
}

/// Validates and compiles template batches for one domain
pub struct TemplateValidator<D: Domain> {
    resolver: Arc<dyn FieldResolver<D>>,
}

impl<D: Domain> TemplateValidator<D> {
    pub fn new(resolver: Arc<dyn FieldResolver<D>>) -> Self {
        Self { resolver }
    }

    pub fn validate(&self, templates: &[TemplateSource]) -> ValidateTemplateResponse {
        ValidateTemplateResponse {
            errors: self.compile(templates).errors,
        }
    }

    /// Compile every template, collecting failures by template id
    pub fn compile(&self, templates: &[TemplateSource]) -> CompiledBatch<D> {
        let compiler = TemplateCompiler::new(self.resolver.as_ref());
        let mut batch = CompiledBatch {
            templates: Vec::with_capacity(templates.len()),
            errors: Vec::new(),
        };

        for template in templates {
            match compiler.compile_source(&template.id, &template.source) {
                Ok(compiled) => batch.templates.push(compiled),
                Err(e) => {
                    tracing::warn!("Template '{}' failed to compile: {}", template.id, e);
                    batch.errors.push(TemplateError {
                        id: template.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            "Compiled {} {} templates, {} failed",
            templates.len(),
            D::NAME,
            batch.errors.len()
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraudo_core::{P2P, Payment};
    use fraudo_runtime::{P2PFieldResolver, PaymentFieldResolver};

    fn payment() -> TemplateValidator<Payment> {
        TemplateValidator::<Payment>::new(Arc::new(PaymentFieldResolver))
    }

    #[test]
    fn test_empty_batch_has_no_errors() {
        let response = payment().validate(&[]);
        assert!(response.is_valid());
        assert_eq!(response, ValidateTemplateResponse::default());
    }

    #[test]
    fn test_one_malformed_template_among_many() {
        let templates = vec![
            TemplateSource::new("ok1", r#"rule:black:inBlackList("email")->decline;"#),
            TemplateSource::new("broken", r#"rule:r:count("mail", 10) > 1 -> decline;"#),
            TemplateSource::new("ok2", r#"rule: amount() > 100 -> notify;"#),
        ];

        let batch = payment().compile(&templates);
        assert_eq!(batch.templates.len(), 2);
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].id, "broken");
        assert!(batch.errors[0].message.contains("mail"));
    }

    #[test]
    fn test_p2p_rejects_outcome_aggregates() {
        let validator = TemplateValidator::<P2P>::new(Arc::new(P2PFieldResolver));
        let response = validator.validate(&[TemplateSource::new(
            "dfs",
            r#"rule:dfs:countSuccess("email", 1444) > 5->accept;"#,
        )]);

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].id, "dfs");
    }
}
