//! Engine configuration

use fraudo_runtime::GeoFailurePolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Historical event store backing the aggregates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Process memory, lost on restart
    Memory,
    /// PostgreSQL (requires the `sqlx` feature)
    Postgres {
        url: String,
        /// Events table, defaults to `<domain>_events`
        #[serde(default)]
        table: Option<String>,
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

fn default_max_connections() -> u32 {
    10
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory
    }
}

/// Remote HTTP service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub base_url: String,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Outstanding list, geo-IP and storage calls across all evaluations
    pub max_concurrent_io: usize,

    /// Budget of one external call
    pub io_timeout_ms: u64,

    /// Budget of one `evaluate` request; unfinished templates time out
    pub request_deadline_ms: u64,

    pub geo_failure_policy: GeoFailurePolicy,

    /// List service; an empty in-memory list store when unset
    pub lists: Option<ServiceEndpoint>,

    /// Geo-IP service; every IP country is unknown when unset
    pub geo_ip: Option<ServiceEndpoint>,

    pub storage: StorageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_io: 64,
            io_timeout_ms: 500,
            request_deadline_ms: 2000,
            geo_failure_policy: GeoFailurePolicy::default(),
            lists: None,
            geo_ip: None,
            storage: StorageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from `.env`, `config/fraudo.*` and `FRAUDO_*`
    /// environment variables (nested keys use `__`)
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/fraudo").required(false))
            .add_source(config::Environment::with_prefix("FRAUDO").separator("__"))
            .build();

        Self::from_sources(config_result)
    }

    /// Deserialize built sources; a failed build falls back to defaults
    fn from_sources(
        config_result: Result<config::Config, config::ConfigError>,
    ) -> anyhow::Result<Self> {
        match config_result {
            Ok(cfg) => cfg
                .try_deserialize()
                .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e)),
            Err(e) => {
                tracing::warn!("Failed to load configuration, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }

    pub fn io_timeout(&self) -> Duration {
        Duration::from_millis(self.io_timeout_ms)
    }

    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }
}
