//! Fraudo Decision Engine SDK
//!
//! High-level API for building fraud engines, validating template batches
//! and scoring transactions.

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod observability;
pub mod templates;
pub mod validator;

// Re-export main types
pub use builder::FraudEngineBuilder;
pub use config::{EngineConfig, ServiceEndpoint, StorageConfig};
pub use engine::FraudEngine;
pub use error::{Result, SdkError};
pub use observability::init_tracing;
pub use templates::{load_templates_file, load_templates_yaml, TemplateSource};
pub use validator::{CompiledBatch, TemplateError, TemplateValidator, ValidateTemplateResponse};

// Re-export commonly used types from dependencies
pub use fraudo_core::{Action, P2PModel, PaymentModel, Payment, P2P};
pub use fraudo_runtime::{
    ErrorKind, EvaluationResult, EventKind, EventStatus, GeoFailurePolicy, HistoricalEvent, Outcome,
    RuleTrace,
};
