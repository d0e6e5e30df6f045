//! Route assembly from the user's start, stops and end point

/// Builds the ordered list of route points
pub struct RouteBuilder;

impl RouteBuilder {
    /// `[start] + stops + [end]`, keeping order and duplicates as entered.
    ///
    /// Place names are not validated here; an unknown name surfaces later as a
    /// resolution failure.
    #[must_use]
    pub fn build(start: &str, stops: &[String], end: &str) -> Vec<String> {
        let mut points = Vec::with_capacity(stops.len() + 2);
        points.push(start.to_string());
        points.extend(stops.iter().cloned());
        points.push(end.to_string());
        points
    }

    /// Split a comma separated stop list, trimming each entry.
    /// Empty and whitespace-only entries (e.g. from "a,,b" or a trailing comma) are dropped.
    #[must_use]
    pub fn parse_stops(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|stop| !stop.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_build_without_stops() {
        let route = RouteBuilder::build("Москва", &[], "Санкт-Петербург");
        assert_eq!(route, vec!["Москва", "Санкт-Петербург"]);
    }

    #[test]
    fn test_build_keeps_order_and_duplicates() {
        let stops = vec!["Казань".to_string(), "Москва".to_string(), "Казань".to_string()];
        let route = RouteBuilder::build("Москва", &stops, "Москва");
        assert_eq!(route, vec!["Москва", "Казань", "Москва", "Казань", "Москва"]);
    }

    #[rstest]
    #[case("Казань, Нижний Новгород", vec!["Казань", "Нижний Новгород"])]
    #[case("  Тверь  ", vec!["Тверь"])]
    #[case("Казань,,Тверь,", vec!["Казань", "Тверь"])]
    #[case(" , ,", vec![])]
    #[case("", vec![])]
    fn test_parse_stops(#[case] input: &str, #[case] expected: Vec<&str>) {
        assert_eq!(RouteBuilder::parse_stops(input), expected);
    }
}
