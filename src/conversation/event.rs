//! Typed inbound events, decoded once at the transport boundary

use std::fmt;
use std::str::FromStr;

use crate::RouteCastError;
use crate::models::{Feature, Interval};

/// Bot commands the conversation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Greeting, no state change
    Start,
    /// Usage guide, no state change
    Help,
    /// Restart the route entry flow
    Weather,
}

impl FromStr for Command {
    type Err = RouteCastError;

    /// Accepts `/start`, `/help`, `/weather`, optionally suffixed with `@botname`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default();
        match name {
            "/start" => Ok(Command::Start),
            "/help" => Ok(Command::Help),
            "/weather" => Ok(Command::Weather),
            _ => Err(RouteCastError::validation(format!("unknown command '{s}'"))),
        }
    }
}

/// Button choice carried in an inline keyboard callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// `true` when the user wants to add intermediate stops
    StopDecision(bool),
    Interval(Interval),
    Feature(Feature),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::StopDecision(true) => f.write_str("stops:yes"),
            Selection::StopDecision(false) => f.write_str("stops:no"),
            Selection::Interval(interval) => write!(f, "interval:{interval}"),
            Selection::Feature(feature) => write!(f, "feature:{feature}"),
        }
    }
}

impl FromStr for Selection {
    type Err = RouteCastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, value) = s
            .split_once(':')
            .ok_or_else(|| RouteCastError::validation(format!("malformed selection '{s}'")))?;

        match (kind, value) {
            ("stops", "yes") => Ok(Selection::StopDecision(true)),
            ("stops", "no") => Ok(Selection::StopDecision(false)),
            ("interval", days) => Ok(Selection::Interval(days.parse()?)),
            ("feature", code) => Ok(Selection::Feature(code.parse()?)),
            _ => Err(RouteCastError::validation(format!("unknown selection '{s}'"))),
        }
    }
}

/// Everything a chat can send us
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Command(Command),
    Text(String),
    Selection(Selection),
    /// Stickers, photos, unknown commands, unparseable button payloads
    Unsupported,
}

/// Payload-free view of an [`Event`], the input of the dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Greeting,
    Help,
    Restart,
    Text,
    StopDecision,
    IntervalChoice,
    FeatureChoice,
    Unsupported,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Greeting,
        EventKind::Help,
        EventKind::Restart,
        EventKind::Text,
        EventKind::StopDecision,
        EventKind::IntervalChoice,
        EventKind::FeatureChoice,
        EventKind::Unsupported,
    ];
}

impl Event {
    /// Message text: a command when it parses as one, plain text otherwise
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if text.starts_with('/') {
            return text.parse().map_or(Event::Unsupported, Event::Command);
        }
        Event::Text(text.to_string())
    }

    /// Callback payload; anything we did not encode ourselves is unsupported
    #[must_use]
    pub fn from_callback(data: &str) -> Self {
        data.parse().map_or(Event::Unsupported, Event::Selection)
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Command(Command::Start) => EventKind::Greeting,
            Event::Command(Command::Help) => EventKind::Help,
            Event::Command(Command::Weather) => EventKind::Restart,
            Event::Text(_) => EventKind::Text,
            Event::Selection(Selection::StopDecision(_)) => EventKind::StopDecision,
            Event::Selection(Selection::Interval(_)) => EventKind::IntervalChoice,
            Event::Selection(Selection::Feature(_)) => EventKind::FeatureChoice,
            Event::Unsupported => EventKind::Unsupported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/start", Command::Start)]
    #[case("/help", Command::Help)]
    #[case("/weather", Command::Weather)]
    #[case("/weather@RouteCastBot", Command::Weather)]
    #[case("/help please", Command::Help)]
    fn test_command_parsing(#[case] text: &str, #[case] command: Command) {
        assert_eq!(text.parse::<Command>().unwrap(), command);
    }

    #[rstest]
    #[case(Selection::StopDecision(true), "stops:yes")]
    #[case(Selection::StopDecision(false), "stops:no")]
    #[case(Selection::Interval(Interval::Three), "interval:3")]
    #[case(Selection::Feature(Feature::Wind), "feature:wind")]
    #[case(Selection::Feature(Feature::Temperature), "feature:temp")]
    fn test_selection_payloads(#[case] selection: Selection, #[case] payload: &str) {
        assert_eq!(selection.to_string(), payload);
        assert_eq!(payload.parse::<Selection>().unwrap(), selection);
    }

    #[rstest]
    #[case("interval:2")]
    #[case("interval:abc")]
    #[case("feature:pressure")]
    #[case("stops:maybe")]
    #[case("add_stops")]
    #[case("")]
    fn test_invalid_selection_payloads(#[case] payload: &str) {
        assert!(payload.parse::<Selection>().is_err());
        assert_eq!(Event::from_callback(payload), Event::Unsupported);
    }

    #[test]
    fn test_event_from_text() {
        assert_eq!(Event::from_text("/weather"), Event::Command(Command::Weather));
        assert_eq!(Event::from_text("/settings"), Event::Unsupported);
        assert_eq!(Event::from_text("Москва"), Event::Text("Москва".into()));
    }

    #[test]
    fn test_event_kinds() {
        assert_eq!(Event::Command(Command::Start).kind(), EventKind::Greeting);
        assert_eq!(
            Event::Selection(Selection::Interval(Interval::Five)).kind(),
            EventKind::IntervalChoice
        );
        assert_eq!(Event::Unsupported.kind(), EventKind::Unsupported);
    }
}
