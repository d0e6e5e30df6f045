//! `OpenMeteo` client: geocoding search and daily forecast, no API key required.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{LocationId, ProviderError, WeatherProvider, check_status};
use crate::models::ForecastRecord;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";

const DAILY_FIELDS: &str = "temperature_2m_max,relative_humidity_2m_mean,wind_speed_10m_max,precipitation_probability_max,weather_code";

pub struct OpenMeteoProvider {
    client: ClientWithMiddleware,
    base_url: String,
    geocoding_url: String,
    language: String,
}

/// Geocoding response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    pub results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
}

/// Daily forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub daily: Option<DailyData>,
}

#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<Option<f64>>,
    #[serde(rename = "relative_humidity_2m_mean")]
    pub humidity_mean: Vec<Option<f64>>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Vec<Option<f64>>,
    #[serde(rename = "precipitation_probability_max")]
    pub precipitation_probability_max: Vec<Option<f64>>,
    pub weather_code: Vec<Option<u8>>,
}

impl DailyData {
    /// Zip the column arrays into per-day records, failing on gaps
    pub fn into_records(self, days: usize) -> Result<Vec<ForecastRecord>, ProviderError> {
        let column = |values: &[Option<f64>], i: usize, name: &str| {
            values
                .get(i)
                .copied()
                .flatten()
                .ok_or_else(|| ProviderError::Parse(format!("Missing {name} for day {i}")))
        };

        self.time
            .iter()
            .take(days)
            .enumerate()
            .map(|(i, day)| {
                let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
                    .map_err(|e| ProviderError::Parse(format!("Invalid date '{day}': {e}")))?;
                let code = self.weather_code.get(i).copied().flatten().unwrap_or(u8::MAX);

                Ok(ForecastRecord {
                    date,
                    temp_max: column(&self.temperature_max, i, "temperature")?,
                    humidity: column(&self.humidity_mean, i, "humidity")?,
                    wind_speed: column(&self.wind_speed_max, i, "wind speed")?,
                    precipitation_probability: column(
                        &self.precipitation_probability_max,
                        i,
                        "precipitation probability",
                    )?,
                    description: weather_code_to_description(code).to_string(),
                })
            })
            .collect()
    }
}

/// Convert a WMO weather code to a Russian description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "ясно",
        1 => "преимущественно ясно",
        2 => "переменная облачность",
        3 => "пасмурно",
        45 => "туман",
        48 => "туман с изморозью",
        51 => "слабая морось",
        53 => "морось",
        55 => "сильная морось",
        56 => "слабая ледяная морось",
        57 => "сильная ледяная морось",
        61 => "небольшой дождь",
        63 => "дождь",
        65 => "сильный дождь",
        66 => "слабый ледяной дождь",
        67 => "сильный ледяной дождь",
        71 => "небольшой снег",
        73 => "снег",
        75 => "сильный снег",
        77 => "снежные зёрна",
        80 => "небольшой ливень",
        81 => "ливень",
        82 => "сильный ливень",
        85 => "небольшой снегопад",
        86 => "сильный снегопад",
        95 => "гроза",
        96 => "гроза с небольшим градом",
        99 => "гроза с сильным градом",
        _ => "нет данных",
    }
}

fn encode_location(latitude: f64, longitude: f64) -> LocationId {
    LocationId::new(format!("{latitude:.4},{longitude:.4}"))
}

fn decode_location(location: &LocationId) -> Result<(f64, f64), ProviderError> {
    location
        .as_str()
        .split_once(',')
        .and_then(|(lat, lon)| Some((lat.parse::<f64>().ok()?, lon.parse::<f64>().ok()?)))
        .ok_or_else(|| ProviderError::Parse(format!("Invalid OpenMeteo location id '{location}'")))
}

impl OpenMeteoProvider {
    pub fn new(
        client: ClientWithMiddleware,
        base_url: String,
        geocoding_url: String,
        language: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            geocoding_url: geocoding_url.trim_end_matches('/').to_string(),
            // geocoding takes a bare language code
            language: language.split('-').next().unwrap_or("ru").to_lowercase(),
        }
    }

    fn geocoding_url(&self, place_name: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language={}&format=json",
            self.geocoding_url,
            urlencoding::encode(place_name),
            self.language
        )
    }

    fn forecast_url(&self, latitude: f64, longitude: f64, days: u8) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&daily={}&timezone=auto&forecast_days={}&wind_speed_unit=kmh",
            self.base_url, latitude, longitude, DAILY_FIELDS, days
        )
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn name(&self) -> &str {
        "open-meteo"
    }

    #[instrument(skip(self))]
    async fn resolve(&self, place_name: &str) -> Result<Option<LocationId>, ProviderError> {
        let response = self.client.get(self.geocoding_url(place_name)).send().await?;
        let response = check_status(response, self.name()).await?;

        let geocoding: GeocodingResponse = response.json().await.map_err(|e| {
            ProviderError::Parse(format!("Failed to parse OpenMeteo geocoding response: {e}"))
        })?;

        let location = geocoding
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|result| {
                debug!(
                    "Resolved '{}' to {} ({}) at ({:.4}, {:.4})",
                    place_name,
                    result.name,
                    result.country.as_deref().unwrap_or("Unknown"),
                    result.latitude,
                    result.longitude
                );
                encode_location(result.latitude, result.longitude)
            });
        Ok(location)
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn forecast(
        &self,
        location: &LocationId,
        days: u8,
    ) -> Result<Vec<ForecastRecord>, ProviderError> {
        let (latitude, longitude) = decode_location(location)?;
        let response = self
            .client
            .get(self.forecast_url(latitude, longitude, days))
            .send()
            .await?;
        let response = check_status(response, self.name()).await?;

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            ProviderError::Parse(format!("Failed to parse OpenMeteo forecast response: {e}"))
        })?;

        forecast
            .daily
            .ok_or_else(|| ProviderError::Parse("OpenMeteo response has no daily data".into()))?
            .into_records(usize::from(days))
    }
}
