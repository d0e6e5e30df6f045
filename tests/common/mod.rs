//! Test doubles for conversation integration tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use routecast::conversation::Reply;
use routecast::{ForecastRecord, LocationId, ProviderError, ReplySink, WeatherProvider};

/// Provider with a fixed set of known places.
///
/// Every known place gets a 7-day forecast regardless of the requested day count,
/// so truncation is exercised. Wind speed encodes the place index and day so
/// series values can be checked.
pub struct FakeProvider {
    known: Vec<String>,
    failing_forecasts: HashSet<String>,
    pub forecast_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn knowing(places: &[&str]) -> Self {
        Self {
            known: places.iter().map(ToString::to_string).collect(),
            failing_forecasts: HashSet::new(),
            forecast_calls: AtomicUsize::new(0),
        }
    }

    /// Resolve `place` but fail its forecast
    pub fn failing_forecast_for(mut self, place: &str) -> Self {
        self.known.push(place.to_string());
        self.failing_forecasts.insert(place.to_string());
        self
    }

    pub fn wind_speed(place_index: usize, day: u32) -> f64 {
        (place_index * 10) as f64 + f64::from(day)
    }
}

#[async_trait]
impl WeatherProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn resolve(&self, place_name: &str) -> Result<Option<LocationId>, ProviderError> {
        Ok(self
            .known
            .iter()
            .position(|known| known == place_name)
            .map(|index| LocationId::new(index.to_string())))
    }

    async fn forecast(
        &self,
        location: &LocationId,
        _days: u8,
    ) -> Result<Vec<ForecastRecord>, ProviderError> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        let index: usize = location
            .as_str()
            .parse()
            .map_err(|_| ProviderError::Parse("bad id".into()))?;

        if self.failing_forecasts.contains(&self.known[index]) {
            return Err(ProviderError::Network("connection reset by peer".into()));
        }

        let first_day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        Ok((0..7u32)
            .map(|day| ForecastRecord {
                date: first_day + Duration::days(i64::from(day)),
                temp_max: 20.0 + f64::from(day),
                humidity: 55.0,
                wind_speed: Self::wind_speed(index, day),
                precipitation_probability: 30.0,
                description: "переменная облачность".to_string(),
            })
            .collect())
    }
}

/// Sink that keeps every reply in order
#[derive(Default)]
pub struct RecordingSink {
    replies: Mutex<Vec<Reply>>,
}

impl RecordingSink {
    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.replies().iter().map(|r| r.body().to_string()).collect()
    }

    pub fn last(&self) -> Reply {
        self.replies().last().cloned().expect("no replies recorded")
    }

    pub fn clear(&self) {
        self.replies.lock().unwrap().clear();
    }
}

#[async_trait]
impl ReplySink for RecordingSink {
    async fn send(&self, reply: Reply) -> routecast::Result<()> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }
}
