//! Weather provider abstraction and HTTP plumbing shared by the providers.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::cache::PersistentCache;
use crate::config::{ProviderKind, RouteCastConfig, WeatherConfig};
use crate::models::ForecastRecord;

pub mod accuweather;
pub mod cached;
pub mod open_meteo;

pub use accuweather::AccuWeatherProvider;
pub use cached::CachedProvider;
pub use open_meteo::OpenMeteoProvider;

/// Errors a weather provider can report for a single call
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit error: {0}")]
    RateLimit(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest_middleware::Error> for ProviderError {
    fn from(err: reqwest_middleware::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

/// Opaque provider-specific location identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationId(String);

impl LocationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A source of daily forecasts for free-text place names.
///
/// Language and units are fixed per provider instance at construction.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short provider name for logs and cache keys
    fn name(&self) -> &str;

    /// Resolve a place name; `Ok(None)` when the provider knows no such place
    async fn resolve(&self, place_name: &str) -> Result<Option<LocationId>, ProviderError>;

    /// Daily forecast for the next `days` days, earliest first
    async fn forecast(
        &self,
        location: &LocationId,
        days: u8,
    ) -> Result<Vec<ForecastRecord>, ProviderError>;
}

/// Build the retrying HTTP client used by the weather providers
pub fn http_client(config: &WeatherConfig) -> Result<ClientWithMiddleware> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(concat!("RouteCast/", env!("CARGO_PKG_VERSION")))
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}

/// Turn a non-success HTTP status into the matching provider error
pub(crate) async fn check_status(
    response: reqwest::Response,
    provider: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        401 | 403 => ProviderError::Authentication(format!("{provider} rejected the API key")),
        429 => ProviderError::RateLimit(format!("{provider} rate limit exceeded")),
        // AccuWeather answers 503 once the daily quota is used up
        503 if body.contains("allowed number of requests") => {
            ProviderError::RateLimit(format!("{provider} daily quota exhausted"))
        }
        code => ProviderError::Api {
            status: code,
            message: body,
        },
    })
}

/// Construct the configured provider, wrapped in the response cache when enabled
pub fn build_provider(config: &RouteCastConfig) -> Result<Arc<dyn WeatherProvider>> {
    let client = http_client(&config.weather)?;

    let provider: Arc<dyn WeatherProvider> = match config.weather.provider {
        ProviderKind::AccuWeather => {
            let api_key = config
                .weather
                .api_key
                .clone()
                .context("AccuWeather requires weather.api_key")?;
            Arc::new(AccuWeatherProvider::new(
                client,
                config.weather.base_url(),
                api_key,
                &config.weather.language,
            ))
        }
        ProviderKind::OpenMeteo => Arc::new(OpenMeteoProvider::new(
            client,
            config.weather.base_url(),
            open_meteo::DEFAULT_GEOCODING_URL.to_string(),
            &config.weather.language,
        )),
    };

    info!("Using weather provider {}", provider.name());

    if !config.cache.enabled {
        return Ok(provider);
    }

    let path = config.cache.path()?;
    let cache = PersistentCache::open(&path)
        .with_context(|| format!("Failed to open cache database at {}", path.display()))?;
    info!("Caching weather responses in {}", path.display());

    Ok(Arc::new(CachedProvider::new(
        provider,
        cache,
        Duration::from_secs(u64::from(config.cache.location_ttl_hours) * 3600),
        Duration::from_secs(u64::from(config.cache.forecast_ttl_minutes) * 60),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_id_display() {
        let id = LocationId::new("294021");
        assert_eq!(id.as_str(), "294021");
        assert_eq!(id.to_string(), "294021");
    }

    #[test]
    fn test_http_client_builds_from_defaults() {
        let config = RouteCastConfig::default();
        assert!(http_client(&config.weather).is_ok());
    }

    #[test]
    fn test_accuweather_without_key_is_rejected() {
        let mut config = RouteCastConfig::default();
        config.weather.provider = ProviderKind::AccuWeather;
        config.weather.api_key = None;
        config.cache.enabled = false;
        assert!(build_provider(&config).is_err());
    }

    #[test]
    fn test_open_meteo_without_cache() {
        let mut config = RouteCastConfig::default();
        config.cache.enabled = false;
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "open-meteo");
    }
}
