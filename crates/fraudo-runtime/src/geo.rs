//! Country resolution
//!
//! `countryBy(field)` yields a country code: the issuing bank country is read
//! straight off the model, the IP country comes from the geo-IP service.

use crate::error::{Result, RuntimeError};
use crate::limiter::IoLimiter;
use async_trait::async_trait;
use fraudo_core::{CheckedField, CoreError, Domain, FieldResolver, GeoDimension};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Country code used when none can be determined
pub const UNKNOWN_COUNTRY: &str = "unknown";

/// IP-to-country lookup
#[async_trait]
pub trait GeoIpService: Send + Sync {
    /// Country of `ip`, `None` when the service has no entry
    async fn country_of(&self, ip: &str) -> Result<Option<String>>;
}

/// What a failed geo-IP lookup turns into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoFailurePolicy {
    /// Log and treat the country as [`UNKNOWN_COUNTRY`]
    #[default]
    Unknown,
    /// Fail the rule with the lookup error
    Propagate,
}

/// Fixed IP-to-country table
#[derive(Debug, Clone, Default)]
pub struct StaticGeoIpService {
    countries: HashMap<String, String>,
}

impl StaticGeoIpService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, ip: impl Into<String>, country: impl Into<String>) -> Self {
        self.countries.insert(ip.into(), country.into());
        self
    }
}

#[async_trait]
impl GeoIpService for StaticGeoIpService {
    async fn country_of(&self, ip: &str) -> Result<Option<String>> {
        Ok(self.countries.get(ip).cloned())
    }
}

#[derive(Debug, Deserialize)]
struct CountryResponse {
    country: Option<String>,
}

/// Geo-IP service reached over HTTP
///
/// `GET {base_url}/country/{ip}` answers `{"country": "RUS"}`; 404 means the
/// IP is unknown to the service.
#[derive(Debug, Clone)]
pub struct HttpGeoIpService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGeoIpService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                RuntimeError::GeoServiceUnavailable(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl GeoIpService for HttpGeoIpService {
    async fn country_of(&self, ip: &str) -> Result<Option<String>> {
        let url = format!("{}/country/{}", self.base_url, urlencoding::encode(ip));
        tracing::debug!("Calling geo-IP service: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RuntimeError::GeoServiceUnavailable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(RuntimeError::GeoServiceUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: CountryResponse = response
            .json()
            .await
            .map_err(|e| RuntimeError::GeoServiceUnavailable(format!("Invalid response: {}", e)))?;
        Ok(body.country.filter(|c| !c.is_empty()))
    }
}

/// Resolves geo fields of a model to country codes
pub struct CountryResolver<D: Domain> {
    resolver: Arc<dyn FieldResolver<D>>,
    geo: Arc<dyn GeoIpService>,
    limiter: IoLimiter,
    policy: GeoFailurePolicy,
}

impl<D: Domain> CountryResolver<D> {
    pub fn new(
        resolver: Arc<dyn FieldResolver<D>>,
        geo: Arc<dyn GeoIpService>,
        limiter: IoLimiter,
        policy: GeoFailurePolicy,
    ) -> Self {
        Self {
            resolver,
            geo,
            limiter,
            policy,
        }
    }

    pub async fn resolve(&self, field: D::Field, model: &D::Model) -> Result<String> {
        match field.geo_dimension() {
            Some(GeoDimension::Bank) => {
                let bank = self.resolver.resolve(field, model)?;
                Ok(non_empty_or_unknown(bank.value))
            }
            Some(GeoDimension::Ip) => {
                let ip = self.resolver.resolve(D::Field::ip(), model)?;
                if ip.is_empty() {
                    return Ok(UNKNOWN_COUNTRY.to_string());
                }
                self.lookup(&ip.value).await
            }
            None => Err(CoreError::unsupported(D::NAME, field.name()).into()),
        }
    }

    async fn lookup(&self, ip: &str) -> Result<String> {
        match self
            .limiter
            .run("geo-IP lookup", self.geo.country_of(ip))
            .await
        {
            Ok(country) => Ok(non_empty_or_unknown(country.unwrap_or_default())),
            Err(e) if self.policy == GeoFailurePolicy::Unknown => {
                tracing::warn!("Geo-IP lookup for {} failed, using '{}': {}", ip, UNKNOWN_COUNTRY, e);
                Ok(UNKNOWN_COUNTRY.to_string())
            }
            Err(e) => Err(e),
        }
    }
}

fn non_empty_or_unknown(country: String) -> String {
    if country.is_empty() {
        UNKNOWN_COUNTRY.to_string()
    } else {
        country
    }
}
