//! Response cache in front of a weather provider.
//!
//! Place name resolutions rarely change and forecast endpoints are quota limited
//! (AccuWeather's free tier allows 50 calls a day), so both are cached. Cache
//! failures never fail the request: they are logged and the inner provider is asked.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::RngExt;
use tracing::{debug, warn};

use super::{LocationId, ProviderError, WeatherProvider};
use crate::cache::PersistentCache;
use crate::models::ForecastRecord;

pub struct CachedProvider {
    inner: Arc<dyn WeatherProvider>,
    cache: PersistentCache,
    location_ttl: Duration,
    forecast_ttl: Duration,
}

impl CachedProvider {
    pub fn new(
        inner: Arc<dyn WeatherProvider>,
        cache: PersistentCache,
        location_ttl: Duration,
        forecast_ttl: Duration,
    ) -> Self {
        Self {
            inner,
            cache,
            location_ttl,
            forecast_ttl,
        }
    }

    fn location_key(&self, place_name: &str) -> String {
        format!(
            "location:{}:{}",
            self.inner.name(),
            place_name.trim().to_lowercase()
        )
    }

    fn forecast_key(&self, location: &LocationId, days: u8) -> String {
        format!("forecast:{}:{}:{}", self.inner.name(), location, days)
    }
}

#[async_trait]
impl WeatherProvider for CachedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn resolve(&self, place_name: &str) -> Result<Option<LocationId>, ProviderError> {
        let key = self.location_key(place_name);

        match self.cache.get::<LocationId>(&key).await {
            Ok(Some(location)) => {
                debug!("Cache hit for location '{}'", place_name);
                return Ok(Some(location));
            }
            Ok(None) => {}
            Err(e) => warn!("Location cache lookup failed: {e}"),
        }

        let resolved = self.inner.resolve(place_name).await?;

        // Unknown places are not cached, the user may retry with a fixed spelling
        if let Some(location) = &resolved {
            let jitter: f32 = rand::rng().random_range(0.9..1.1);
            let ttl = self.location_ttl.mul_f32(jitter);
            if let Err(e) = self.cache.put(&key, location.clone(), ttl).await {
                warn!("Failed to cache location '{}': {e}", place_name);
            }
        }

        Ok(resolved)
    }

    async fn forecast(
        &self,
        location: &LocationId,
        days: u8,
    ) -> Result<Vec<ForecastRecord>, ProviderError> {
        let key = self.forecast_key(location, days);

        match self.cache.get::<Vec<ForecastRecord>>(&key).await {
            Ok(Some(records)) => {
                debug!("Cache hit for forecast {}", key);
                return Ok(records);
            }
            Ok(None) => {}
            Err(e) => warn!("Forecast cache lookup failed: {e}"),
        }

        let records = self.inner.forecast(location, days).await?;

        if !records.is_empty() {
            if let Err(e) = self.cache.put(&key, records.clone(), self.forecast_ttl).await {
                warn!("Failed to cache forecast {}: {e}", key);
            }
        }

        Ok(records)
    }
}
