//! Builder pattern for FraudEngine

use crate::config::{EngineConfig, StorageConfig};
use crate::engine::FraudEngine;
use crate::error::Result;
use fraudo_core::{Domain, FieldResolver, Payment, P2P};
use fraudo_runtime::{
    EventRepository, GeoIpService, HttpGeoIpService, HttpListService, InMemoryEventRepository,
    IoLimiter, ListService, MemoryListService, P2PFieldResolver, PaymentFieldResolver,
    RuleEvaluator, StaticGeoIpService,
};
use std::sync::Arc;

/// Builder for FraudEngine
///
/// # Example
///
/// ```rust,ignore
/// use fraudo_sdk::{EngineConfig, FraudEngineBuilder};
///
/// let engine = FraudEngineBuilder::payment()
///     .with_config(EngineConfig::load()?)
///     .build()
///     .await?;
///
/// // Test wiring with in-memory collaborators
/// let engine = FraudEngineBuilder::p2p()
///     .with_repository(repository.clone())
///     .with_list_service(lists)
///     .build()
///     .await?;
/// ```
pub struct FraudEngineBuilder<D: Domain> {
    config: EngineConfig,
    resolver: Arc<dyn FieldResolver<D>>,
    repository: Option<Arc<dyn EventRepository>>,
    list_service: Option<Arc<dyn ListService>>,
    geo_service: Option<Arc<dyn GeoIpService>>,
}

impl FraudEngineBuilder<Payment> {
    /// Builder wired with the payment field resolver
    pub fn payment() -> Self {
        Self::new(Arc::new(PaymentFieldResolver))
    }
}

impl FraudEngineBuilder<P2P> {
    /// Builder wired with the P2P field resolver
    pub fn p2p() -> Self {
        Self::new(Arc::new(P2PFieldResolver))
    }
}

impl<D: Domain> FraudEngineBuilder<D> {
    /// Create a builder around a custom field resolver
    pub fn new(resolver: Arc<dyn FieldResolver<D>>) -> Self {
        Self {
            config: EngineConfig::default(),
            resolver,
            repository: None,
            list_service: None,
            geo_service: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this event store instead of the configured one
    pub fn with_repository(mut self, repository: Arc<dyn EventRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Use this list service instead of the configured one
    pub fn with_list_service(mut self, service: Arc<dyn ListService>) -> Self {
        self.list_service = Some(service);
        self
    }

    /// Use this geo-IP service instead of the configured one
    pub fn with_geo_service(mut self, service: Arc<dyn GeoIpService>) -> Self {
        self.geo_service = Some(service);
        self
    }

    pub async fn build(self) -> Result<FraudEngine<D>> {
        let config = self.config;
        let limiter = IoLimiter::new(config.max_concurrent_io, config.io_timeout());

        let repository = match self.repository {
            Some(repository) => repository,
            None => Self::repository_from_config(&config.storage).await?,
        };

        let list_service: Arc<dyn ListService> = match (self.list_service, &config.lists) {
            (Some(service), _) => service,
            (None, Some(endpoint)) => {
                Arc::new(HttpListService::new(&endpoint.base_url, config.io_timeout())?)
            }
            (None, None) => {
                tracing::warn!("No list service configured, every list is empty");
                Arc::new(MemoryListService::new())
            }
        };

        let geo_service: Arc<dyn GeoIpService> = match (self.geo_service, &config.geo_ip) {
            (Some(service), _) => service,
            (None, Some(endpoint)) => {
                Arc::new(HttpGeoIpService::new(&endpoint.base_url, config.io_timeout())?)
            }
            (None, None) => {
                tracing::warn!("No geo-IP service configured, IP countries resolve as unknown");
                Arc::new(StaticGeoIpService::new())
            }
        };

        let evaluator = RuleEvaluator::new(
            self.resolver.clone(),
            repository.clone(),
            list_service,
            geo_service,
            limiter,
            config.geo_failure_policy,
        );

        tracing::info!(
            "Built {} engine (max_concurrent_io={}, io_timeout={}ms, deadline={}ms, geo_policy={:?})",
            D::NAME,
            config.max_concurrent_io,
            config.io_timeout_ms,
            config.request_deadline_ms,
            config.geo_failure_policy
        );

        Ok(FraudEngine::new(
            self.resolver,
            evaluator,
            repository,
            config.request_deadline(),
        ))
    }

    #[cfg_attr(not(feature = "sqlx"), allow(unused_variables))]
    async fn repository_from_config(storage: &StorageConfig) -> Result<Arc<dyn EventRepository>> {
        match storage {
            StorageConfig::Memory => Ok(Arc::new(InMemoryEventRepository::new())),
            StorageConfig::Postgres {
                url,
                table,
                max_connections,
            } => {
                #[cfg(feature = "sqlx")]
                {
                    let table = table
                        .clone()
                        .unwrap_or_else(|| format!("{}_events", D::NAME));
                    let repository = fraudo_runtime::PostgresEventRepository::connect(
                        url,
                        *max_connections,
                        &table,
                    )
                    .await?;
                    Ok(Arc::new(repository))
                }

                #[cfg(not(feature = "sqlx"))]
                {
                    Err(crate::error::SdkError::ConfigError(
                        "postgres storage requires the 'sqlx' feature".to_string(),
                    ))
                }
            }
        }
    }
}
