//! Daily forecast record and per-point forecast collection

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Feature;

/// One day of forecast data for one route point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastRecord {
    /// Calendar date of the forecast day
    pub date: NaiveDate,
    /// Maximum temperature in Celsius
    pub temp_max: f64,
    /// Relative humidity in percent
    pub humidity: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Probability of precipitation in percent
    pub precipitation_probability: f64,
    /// Human-readable description of weather conditions
    pub description: String,
}

impl ForecastRecord {
    /// Format maximum temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", format_number(self.temp_max))
    }

    /// Format humidity with unit
    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", format_number(self.humidity))
    }

    /// Format wind speed with unit
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} км/ч", format_number(self.wind_speed))
    }

    /// Format weather description with the first letter capitalized
    #[must_use]
    pub fn format_description(&self) -> String {
        capitalize(&self.description)
    }

    /// Multi-line summary block used in the per-point forecast message
    #[must_use]
    pub fn format_summary(&self) -> String {
        format!(
            "{}:\nТемпература: {}\nВлажность: {}\nВетер: {}\n{}\n",
            self.date.format("%Y-%m-%d"),
            self.format_temperature(),
            self.format_humidity(),
            self.format_wind(),
            self.format_description()
        )
    }
}

/// Forecast series for a single route point.
///
/// `dates` and `temps` are derived from `records` at construction, so the three
/// sequences always have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PointForecast {
    point: String,
    records: Vec<ForecastRecord>,
    dates: Vec<NaiveDate>,
    temps: Vec<f64>,
}

impl PointForecast {
    /// Create a point forecast from the provider records
    #[must_use]
    pub fn new(point: impl Into<String>, records: Vec<ForecastRecord>) -> Self {
        let dates = records.iter().map(|r| r.date).collect();
        let temps = records.iter().map(|r| r.temp_max).collect();
        Self {
            point: point.into(),
            records,
            dates,
            temps,
        }
    }

    /// Route point name as the user typed it
    #[must_use]
    pub fn point(&self) -> &str {
        &self.point
    }

    #[must_use]
    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    #[must_use]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    #[must_use]
    pub fn temps(&self) -> &[f64] {
        &self.temps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of the given feature, aligned with `dates`
    #[must_use]
    pub fn values(&self, feature: Feature) -> Vec<f64> {
        self.records.iter().map(|r| feature.value(r)).collect()
    }
}

/// Print whole numbers without a fractional part, everything else with one decimal
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Uppercase the first character and lowercase the rest
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(day: u32, temp_max: f64) -> ForecastRecord {
        ForecastRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            temp_max,
            humidity: 60.0,
            wind_speed: 12.5,
            precipitation_probability: 20.0,
            description: "ПЕРЕМЕННАЯ облачность".to_string(),
        }
    }

    #[test]
    fn test_point_forecast_parallel_arrays() {
        let forecast = PointForecast::new("Москва", vec![record(1, 21.0), record(2, 23.5)]);
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast.dates().len(), forecast.records().len());
        assert_eq!(forecast.temps(), &[21.0, 23.5]);
        assert_eq!(forecast.dates()[1], NaiveDate::from_ymd_opt(2024, 6, 2).unwrap());
    }

    #[test]
    fn test_values_follow_feature() {
        let forecast = PointForecast::new("Казань", vec![record(1, 21.0)]);
        assert_eq!(forecast.values(Feature::Wind), vec![12.5]);
        assert_eq!(forecast.values(Feature::Temperature), vec![21.0]);
    }

    #[test]
    fn test_format_summary() {
        let summary = record(3, 18.0).format_summary();
        assert_eq!(
            summary,
            "2024-06-03:\nТемпература: 18°C\nВлажность: 60%\nВетер: 12.5 км/ч\nПеременная облачность\n"
        );
    }

    #[test]
    fn test_capitalize_edge_cases() {
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ясно"), "Ясно");
        assert_eq!(capitalize("SUNNY"), "Sunny");
    }
}
