//! Forecast horizon selectable by the user

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RouteCastError;

/// Number of forecast days: 1, 3 or 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    One,
    Three,
    Five,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::One, Interval::Three, Interval::Five];

    #[must_use]
    pub fn days(self) -> u8 {
        match self {
            Interval::One => 1,
            Interval::Three => 3,
            Interval::Five => 5,
        }
    }

    /// Day count with the matching Russian noun, e.g. "3 дня"
    #[must_use]
    pub fn label(self) -> String {
        format!("{} {}", self.days(), days_word(self.days()))
    }
}

/// Russian plural form of "day" for a count
#[must_use]
pub fn days_word(count: u8) -> &'static str {
    let last = count % 10;
    let last_two = count % 100;
    if last == 1 && last_two != 11 {
        "день"
    } else if (2..=4).contains(&last) && !(12..=14).contains(&last_two) {
        "дня"
    } else {
        "дней"
    }
}

impl TryFrom<u8> for Interval {
    type Error = RouteCastError;

    fn try_from(days: u8) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(Interval::One),
            3 => Ok(Interval::Three),
            5 => Ok(Interval::Five),
            other => Err(RouteCastError::validation(format!(
                "interval must be 1, 3 or 5 days, got {other}"
            ))),
        }
    }
}

impl FromStr for Interval {
    type Err = RouteCastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days: u8 = s
            .parse()
            .map_err(|_| RouteCastError::validation(format!("invalid interval '{s}'")))?;
        Interval::try_from(days)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "1 день")]
    #[case(3, "3 дня")]
    #[case(5, "5 дней")]
    fn test_valid_intervals(#[case] days: u8, #[case] label: &str) {
        let interval = Interval::try_from(days).unwrap();
        assert_eq!(interval.days(), days);
        assert_eq!(interval.label(), label);
        assert_eq!(interval.to_string().parse::<Interval>().unwrap(), interval);
    }

    #[rstest]
    #[case(0)]
    #[case(2)]
    #[case(4)]
    #[case(7)]
    fn test_invalid_intervals(#[case] days: u8) {
        assert!(Interval::try_from(days).is_err());
    }

    #[test]
    fn test_parse_garbage() {
        assert!("three".parse::<Interval>().is_err());
    }

    #[rstest]
    #[case(11, "дней")]
    #[case(21, "день")]
    #[case(22, "дня")]
    #[case(14, "дней")]
    fn test_days_word(#[case] count: u8, #[case] word: &str) {
        assert_eq!(days_word(count), word);
    }
}
