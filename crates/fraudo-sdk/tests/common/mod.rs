//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use fraudo_runtime::{
    AggregateQuery, EventRepository, EventStatus, GeoIpService, HistoricalEvent,
    InMemoryEventRepository, ListService, MemoryListService, RuntimeError, StaticGeoIpService,
};
use fraudo_sdk::{
    EngineConfig, FraudEngine, FraudEngineBuilder, P2PModel, Payment, PaymentModel, TemplateSource,
    P2P,
};
use std::sync::Arc;
use std::time::Duration;

pub const MINUTE: i64 = 60_000;

/// Payment engine wired with in-memory collaborators
pub struct TestEngine {
    pub engine: FraudEngine<Payment>,
    pub repository: Arc<InMemoryEventRepository>,
    pub lists: Arc<MemoryListService>,
}

impl TestEngine {
    pub async fn new() -> Self {
        Self::with_config(EngineConfig::default()).await
    }

    pub async fn with_config(config: EngineConfig) -> Self {
        let repository = Arc::new(InMemoryEventRepository::new());
        let lists = Arc::new(MemoryListService::new());
        let geo = StaticGeoIpService::new()
            .with_entry("10.0.0.1", "RUS")
            .with_entry("10.0.0.2", "ARM");

        let engine = FraudEngineBuilder::payment()
            .with_config(config)
            .with_repository(repository.clone())
            .with_list_service(lists.clone())
            .with_geo_service(Arc::new(geo))
            .build()
            .await
            .expect("engine should build");

        Self {
            engine,
            repository,
            lists,
        }
    }

    /// Compile templates, failing the test on any compile error
    pub fn compile(
        &self,
        templates: &[TemplateSource],
    ) -> Vec<fraudo_compiler::CompiledTemplate<fraudo_core::PaymentCheckedField>> {
        let batch = self.engine.compile_templates(templates);
        assert!(batch.errors.is_empty(), "compile errors: {:?}", batch.errors);
        batch.templates
    }

    pub async fn seed(&self, events: Vec<HistoricalEvent>) {
        self.repository
            .insert_batch(events)
            .await
            .expect("seed history");
    }
}

pub async fn p2p_engine(repository: Arc<InMemoryEventRepository>) -> FraudEngine<P2P> {
    FraudEngineBuilder::p2p()
        .with_repository(repository)
        .build()
        .await
        .expect("engine should build")
}

pub fn template(id: &str, source: &str) -> TemplateSource {
    TemplateSource::new(id, source)
}

pub fn payment(email: &str, card: &str, party: &str) -> PaymentModel {
    PaymentModel {
        party_id: party.to_string(),
        shop_id: "S1".to_string(),
        amount: 5000,
        currency: "RUB".to_string(),
        email: Some(email.to_string()),
        ip: Some("10.0.0.1".to_string()),
        card_token: Some(card.to_string()),
        bin_country_code: Some("ARM".to_string()),
        ..Default::default()
    }
}

pub fn transfer(identity: &str, from: &str, to: &str) -> P2PModel {
    P2PModel {
        identity_id: identity.to_string(),
        amount: 700,
        currency: "RUB".to_string(),
        email: Some("p2p@x.com".to_string()),
        card_token_from: Some(from.to_string()),
        card_token_to: Some(to.to_string()),
        ..Default::default()
    }
}

/// Past payment with the given age in minutes
pub fn past_payment(
    status: EventStatus,
    amount: i64,
    email: &str,
    card: &str,
    party: &str,
    age_minutes: i64,
) -> HistoricalEvent {
    HistoricalEvent::new("history", status, amount)
        .at(chrono::Utc::now().timestamp_millis() - age_minutes * MINUTE)
        .with_attribute("email", email)
        .with_attribute("card_token", card)
        .with_attribute("party_id", party)
}

/// List service that answers after a fixed delay
pub struct SlowListService {
    pub delay: Duration,
}

#[async_trait]
impl ListService for SlowListService {
    async fn is_member(&self, _list_id: &str, _key: &str) -> fraudo_runtime::Result<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(false)
    }
}

/// Repository whose aggregate queries always fail
pub struct FailingRepository;

#[async_trait]
impl EventRepository for FailingRepository {
    async fn insert(&self, _event: HistoricalEvent) -> fraudo_runtime::Result<()> {
        Ok(())
    }

    async fn insert_batch(&self, _events: Vec<HistoricalEvent>) -> fraudo_runtime::Result<()> {
        Ok(())
    }

    async fn aggregate(&self, _query: AggregateQuery) -> fraudo_runtime::Result<i64> {
        Err(RuntimeError::AggregateQuery(
            "connection refused".to_string(),
        ))
    }
}

/// Geo-IP service that cannot be reached
pub struct UnreachableGeoService;

#[async_trait]
impl GeoIpService for UnreachableGeoService {
    async fn country_of(&self, _ip: &str) -> fraudo_runtime::Result<Option<String>> {
        Err(RuntimeError::GeoServiceUnavailable("HTTP 503".to_string()))
    }
}
