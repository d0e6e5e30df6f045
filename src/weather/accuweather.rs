//! AccuWeather client: city autocomplete for location keys and the 5-day daily forecast.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{LocationId, ProviderError, WeatherProvider, check_status};
use crate::models::ForecastRecord;

pub const DEFAULT_BASE_URL: &str = "http://dataservice.accuweather.com";

/// AccuWeather API client
pub struct AccuWeatherProvider {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    language: String,
}

/// Autocomplete entry; only the location key is used
#[derive(Debug, Deserialize)]
pub struct CityMatch {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LocalizedName")]
    pub localized_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecastResponse {
    #[serde(rename = "DailyForecasts")]
    pub daily_forecasts: Vec<DailyForecast>,
}

#[derive(Debug, Deserialize)]
pub struct DailyForecast {
    /// ISO timestamp with offset, e.g. "2024-06-01T07:00:00+03:00"
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Temperature")]
    pub temperature: Temperature,
    #[serde(rename = "Day")]
    pub day: DayPart,
}

#[derive(Debug, Deserialize)]
pub struct Temperature {
    #[serde(rename = "Maximum")]
    pub maximum: Measurement,
}

#[derive(Debug, Deserialize)]
pub struct Measurement {
    #[serde(rename = "Value")]
    pub value: f64,
}

#[derive(Debug, Deserialize)]
pub struct DayPart {
    #[serde(rename = "LongPhrase")]
    pub long_phrase: String,
    #[serde(rename = "PrecipitationProbability")]
    pub precipitation_probability: f64,
    #[serde(rename = "Wind")]
    pub wind: Wind,
    #[serde(rename = "RelativeHumidity")]
    pub relative_humidity: Humidity,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    #[serde(rename = "Speed")]
    pub speed: Measurement,
}

/// Older responses carry a plain number, current ones a min/max/average object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Humidity {
    Value(f64),
    Range {
        #[serde(rename = "Average")]
        average: f64,
    },
}

impl Humidity {
    fn percent(&self) -> f64 {
        match self {
            Humidity::Value(value) => *value,
            Humidity::Range { average } => *average,
        }
    }
}

impl DailyForecast {
    /// Convert to the internal record; the date is the calendar part of `Date`
    pub fn into_record(self) -> Result<ForecastRecord, ProviderError> {
        let date = self
            .date
            .get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
            .ok_or_else(|| ProviderError::Parse(format!("Invalid forecast date '{}'", self.date)))?;

        Ok(ForecastRecord {
            date,
            temp_max: self.temperature.maximum.value,
            humidity: self.day.relative_humidity.percent(),
            wind_speed: self.day.wind.speed.value,
            precipitation_probability: self.day.precipitation_probability,
            description: self.day.long_phrase,
        })
    }
}

impl AccuWeatherProvider {
    /// Create a new client. A bare language tag like "ru" is expanded to "ru-ru".
    pub fn new(
        client: ClientWithMiddleware,
        base_url: String,
        api_key: String,
        language: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language: expand_language(language),
        }
    }

    fn autocomplete_url(&self, place_name: &str) -> String {
        format!(
            "{}/locations/v1/cities/autocomplete?apikey={}&q={}&language={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(place_name),
            self.language
        )
    }

    fn forecast_url(&self, location: &LocationId) -> String {
        format!(
            "{}/forecasts/v1/daily/5day/{}?apikey={}&language={}&details=true&metric=true",
            self.base_url,
            urlencoding::encode(location.as_str()),
            urlencoding::encode(&self.api_key),
            self.language
        )
    }
}

fn expand_language(language: &str) -> String {
    let language = language.to_lowercase();
    if language.contains('-') {
        language
    } else {
        format!("{language}-{language}")
    }
}

#[async_trait]
impl WeatherProvider for AccuWeatherProvider {
    fn name(&self) -> &str {
        "accuweather"
    }

    #[instrument(skip(self))]
    async fn resolve(&self, place_name: &str) -> Result<Option<LocationId>, ProviderError> {
        let response = self.client.get(self.autocomplete_url(place_name)).send().await?;
        let response = check_status(response, self.name()).await?;

        let matches: Vec<CityMatch> = response.json().await.map_err(|e| {
            ProviderError::Parse(format!("Failed to parse AccuWeather autocomplete response: {e}"))
        })?;

        let location = matches.into_iter().next().map(|city| {
            debug!(
                "Resolved '{}' to key {} ({})",
                place_name,
                city.key,
                city.localized_name.as_deref().unwrap_or("?")
            );
            LocationId::new(city.key)
        });
        Ok(location)
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn forecast(
        &self,
        location: &LocationId,
        days: u8,
    ) -> Result<Vec<ForecastRecord>, ProviderError> {
        let response = self.client.get(self.forecast_url(location)).send().await?;
        let response = check_status(response, self.name()).await?;

        let forecast: DailyForecastResponse = response.json().await.map_err(|e| {
            ProviderError::Parse(format!("Failed to parse AccuWeather forecast response: {e}"))
        })?;

        forecast
            .daily_forecasts
            .into_iter()
            .take(usize::from(days))
            .map(DailyForecast::into_record)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteCastConfig;
    use crate::weather::http_client;

    const FORECAST_JSON: &str = r#"{
        "Headline": {"Text": "Тепло"},
        "DailyForecasts": [
            {
                "Date": "2024-06-01T07:00:00+03:00",
                "Temperature": {"Minimum": {"Value": 12.0}, "Maximum": {"Value": 24.4}},
                "Day": {
                    "LongPhrase": "переменная облачность",
                    "PrecipitationProbability": 25,
                    "Wind": {"Speed": {"Value": 11.1, "Unit": "km/h"}},
                    "RelativeHumidity": {"Minimum": 40, "Maximum": 80, "Average": 61}
                }
            },
            {
                "Date": "2024-06-02T07:00:00+03:00",
                "Temperature": {"Maximum": {"Value": 19.0}},
                "Day": {
                    "LongPhrase": "дождь",
                    "PrecipitationProbability": 90,
                    "Wind": {"Speed": {"Value": 20.4}},
                    "RelativeHumidity": 88
                }
            }
        ]
    }"#;

    fn provider() -> AccuWeatherProvider {
        let client = http_client(&RouteCastConfig::default().weather).unwrap();
        AccuWeatherProvider::new(client, format!("{DEFAULT_BASE_URL}/"), "secret key".into(), "ru")
    }

    #[test]
    fn test_parse_daily_forecast() {
        let response: DailyForecastResponse = serde_json::from_str(FORECAST_JSON).unwrap();
        let records: Vec<ForecastRecord> = response
            .daily_forecasts
            .into_iter()
            .map(|day| day.into_record().unwrap())
            .collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(records[0].temp_max, 24.4);
        assert_eq!(records[0].humidity, 61.0);
        assert_eq!(records[0].wind_speed, 11.1);
        assert_eq!(records[0].precipitation_probability, 25.0);
        assert_eq!(records[1].humidity, 88.0);
        assert_eq!(records[1].description, "дождь");
    }

    #[test]
    fn test_invalid_date_is_parse_error() {
        let day = DailyForecast {
            date: "June".to_string(),
            temperature: Temperature {
                maximum: Measurement { value: 1.0 },
            },
            day: DayPart {
                long_phrase: String::new(),
                precipitation_probability: 0.0,
                wind: Wind {
                    speed: Measurement { value: 0.0 },
                },
                relative_humidity: Humidity::Value(50.0),
            },
        };
        assert!(matches!(day.into_record(), Err(ProviderError::Parse(_))));
    }

    #[test]
    fn test_urls() {
        let provider = provider();
        assert_eq!(
            provider.autocomplete_url("Нижний Новгород"),
            "http://dataservice.accuweather.com/locations/v1/cities/autocomplete?apikey=secret%20key&q=%D0%9D%D0%B8%D0%B6%D0%BD%D0%B8%D0%B9%20%D0%9D%D0%BE%D0%B2%D0%B3%D0%BE%D1%80%D0%BE%D0%B4&language=ru-ru"
        );
        assert_eq!(
            provider.forecast_url(&LocationId::new("294021")),
            "http://dataservice.accuweather.com/forecasts/v1/daily/5day/294021?apikey=secret%20key&language=ru-ru&details=true&metric=true"
        );
    }

    #[test]
    fn test_expand_language() {
        assert_eq!(expand_language("ru"), "ru-ru");
        assert_eq!(expand_language("en-US"), "en-us");
    }
}
