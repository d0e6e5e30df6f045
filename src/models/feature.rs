//! Chartable weather metrics

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ForecastRecord;
use crate::RouteCastError;

/// Weather metric compared across route points on a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Temperature,
    Humidity,
    Wind,
    Precipitation,
}

impl Feature {
    /// All features in keyboard order
    pub const ALL: [Feature; 4] = [
        Feature::Temperature,
        Feature::Humidity,
        Feature::Wind,
        Feature::Precipitation,
    ];

    /// Short code used in button payloads
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Feature::Temperature => "temp",
            Feature::Humidity => "humidity",
            Feature::Wind => "wind",
            Feature::Precipitation => "precipitation",
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Feature::Temperature => "Температура",
            Feature::Humidity => "Влажность",
            Feature::Wind => "Скорость ветра",
            Feature::Precipitation => "Вероятность осадков",
        }
    }

    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Feature::Temperature => "°C",
            Feature::Humidity | Feature::Precipitation => "%",
            Feature::Wind => "км/ч",
        }
    }

    /// Y axis label, e.g. "Скорость ветра (км/ч)"
    #[must_use]
    pub fn axis_label(self) -> String {
        format!("{} ({})", self.display_name(), self.unit())
    }

    /// Extract this feature's value from a forecast record
    #[must_use]
    pub fn value(self, record: &ForecastRecord) -> f64 {
        match self {
            Feature::Temperature => record.temp_max,
            Feature::Humidity => record.humidity,
            Feature::Wind => record.wind_speed,
            Feature::Precipitation => record.precipitation_probability,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Feature {
    type Err = RouteCastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.code() == s)
            .ok_or_else(|| RouteCastError::validation(format!("unknown feature '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::tests::record;
    use rstest::rstest;

    #[rstest]
    #[case("temp", Feature::Temperature)]
    #[case("humidity", Feature::Humidity)]
    #[case("wind", Feature::Wind)]
    #[case("precipitation", Feature::Precipitation)]
    fn test_feature_codes(#[case] code: &str, #[case] feature: Feature) {
        assert_eq!(code.parse::<Feature>().unwrap(), feature);
        assert_eq!(feature.to_string(), code);
    }

    #[test]
    fn test_unknown_feature_code() {
        assert!("pressure".parse::<Feature>().is_err());
    }

    #[rstest]
    #[case(Feature::Temperature, "Температура (°C)")]
    #[case(Feature::Humidity, "Влажность (%)")]
    #[case(Feature::Wind, "Скорость ветра (км/ч)")]
    #[case(Feature::Precipitation, "Вероятность осадков (%)")]
    fn test_axis_labels(#[case] feature: Feature, #[case] label: &str) {
        assert_eq!(feature.axis_label(), label);
    }

    #[test]
    fn test_value_extraction() {
        let record = record(1, 25.0);
        assert_eq!(Feature::Temperature.value(&record), 25.0);
        assert_eq!(Feature::Humidity.value(&record), 60.0);
        assert_eq!(Feature::Wind.value(&record), 12.5);
        assert_eq!(Feature::Precipitation.value(&record), 20.0);
    }
}
