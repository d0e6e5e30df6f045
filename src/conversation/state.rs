//! Conversation states and the dispatch table over (state, event kind)

use super::event::EventKind;

/// Where a session is in the route entry flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Idle,
    AwaitingStart,
    AwaitingEnd,
    AwaitingStopDecision,
    AwaitingStops,
    AwaitingInterval,
    AwaitingFeature,
}

impl State {
    pub const ALL: [State; 7] = [
        State::Idle,
        State::AwaitingStart,
        State::AwaitingEnd,
        State::AwaitingStopDecision,
        State::AwaitingStops,
        State::AwaitingInterval,
        State::AwaitingFeature,
    ];
}

/// Transition handler selected for an incoming event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Greet,
    ShowHelp,
    Restart,
    AcceptStart,
    AcceptEnd,
    DecideStops,
    AcceptStops,
    RunForecast,
    BuildChart,
    Unrecognized,
}

/// The complete transition table. Anything not listed is unrecognized and
/// leaves the session untouched.
#[must_use]
pub fn dispatch(state: State, event: EventKind) -> Action {
    match (state, event) {
        (_, EventKind::Greeting) => Action::Greet,
        (_, EventKind::Help) => Action::ShowHelp,
        (_, EventKind::Restart) => Action::Restart,
        (State::AwaitingStart, EventKind::Text) => Action::AcceptStart,
        (State::AwaitingEnd, EventKind::Text) => Action::AcceptEnd,
        (State::AwaitingStopDecision, EventKind::StopDecision) => Action::DecideStops,
        (State::AwaitingStops, EventKind::Text) => Action::AcceptStops,
        (State::AwaitingInterval, EventKind::IntervalChoice) => Action::RunForecast,
        (State::AwaitingFeature, EventKind::FeatureChoice) => Action::BuildChart,
        _ => Action::Unrecognized,
    }
}
