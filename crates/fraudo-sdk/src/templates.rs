//! Template sources and YAML template batches

use crate::error::{Result, SdkError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rule template text with its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSource {
    pub id: String,
    pub source: String,
}

impl TemplateSource {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    templates: Vec<TemplateSource>,
}

/// Parse a YAML template batch:
///
/// ```yaml
/// templates:
///   - id: payment_main
///     source: |
///       rule:black:inBlackList("email")->decline;
/// ```
pub fn load_templates_yaml(content: &str) -> Result<Vec<TemplateSource>> {
    let file: TemplateFile = serde_yaml::from_str(content)
        .map_err(|e| SdkError::InvalidTemplateFile(e.to_string()))?;
    Ok(file.templates)
}

/// Read and parse a YAML template batch from disk
pub fn load_templates_file(path: impl AsRef<Path>) -> Result<Vec<TemplateSource>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let templates = load_templates_yaml(&content)?;
    tracing::info!("Loaded {} templates from {}", templates.len(), path.display());
    Ok(templates)
}
