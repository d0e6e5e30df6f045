//! Transition handlers for the route entry flow

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::event::{Event, Selection};
use super::messages;
use super::reply::{Keyboard, Reply, ReplySink};
use super::session::Session;
use super::state::{Action, State, dispatch};
use crate::aggregator::{ForecastAggregator, notify};
use crate::chart::{self, ChartOutcome};
use crate::models::{Feature, Interval};
use crate::route::RouteBuilder;
use crate::weather::WeatherProvider;

const CHART_FILE_NAME: &str = "weather_graph.png";

/// Drives one session through the flow, one event at a time
pub struct ConversationMachine {
    aggregator: ForecastAggregator,
}

impl ConversationMachine {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            aggregator: ForecastAggregator::new(provider),
        }
    }

    /// Apply `event` to `session`, sending every reply through `sink`.
    /// Never fails: problems become notices to the chat.
    pub async fn handle(&self, session: &mut Session, event: Event, sink: &dyn ReplySink) {
        let action = dispatch(session.state, event.kind());
        debug!(state = ?session.state, ?action, "Dispatching event");

        match (action, event) {
            (Action::Greet, _) => notify(sink, Reply::text(messages::GREETING)).await,
            (Action::ShowHelp, _) => notify(sink, Reply::markdown(messages::HELP)).await,
            (Action::Restart, _) => {
                session.restart();
                notify(sink, Reply::text(messages::ASK_START)).await;
            }
            (Action::AcceptStart, Event::Text(text)) => {
                session.start_point = text.trim().to_string();
                session.state = State::AwaitingEnd;
                notify(sink, Reply::text(messages::ASK_END)).await;
            }
            (Action::AcceptEnd, Event::Text(text)) => {
                session.end_point = text.trim().to_string();
                session.state = State::AwaitingStopDecision;
                notify(
                    sink,
                    Reply::with_keyboard(messages::ASK_STOP_DECISION, Keyboard::stop_decision()),
                )
                .await;
            }
            (Action::DecideStops, Event::Selection(Selection::StopDecision(true))) => {
                session.state = State::AwaitingStops;
                notify(sink, Reply::text(messages::ASK_STOPS)).await;
            }
            (Action::DecideStops, Event::Selection(Selection::StopDecision(false))) => {
                session.stops.clear();
                self.ask_interval(session, sink).await;
            }
            (Action::AcceptStops, Event::Text(text)) => {
                session.stops = RouteBuilder::parse_stops(&text);
                self.ask_interval(session, sink).await;
            }
            (Action::RunForecast, Event::Selection(Selection::Interval(interval))) => {
                self.run_forecast(session, interval, sink).await;
            }
            (Action::BuildChart, Event::Selection(Selection::Feature(feature))) => {
                self.send_chart(session, feature, sink).await;
            }
            _ => notify(sink, Reply::text(messages::UNRECOGNIZED)).await,
        }
    }

    async fn ask_interval(&self, session: &mut Session, sink: &dyn ReplySink) {
        session.state = State::AwaitingInterval;
        notify(
            sink,
            Reply::with_keyboard(messages::ASK_INTERVAL, Keyboard::intervals()),
        )
        .await;
    }

    async fn run_forecast(&self, session: &mut Session, interval: Interval, sink: &dyn ReplySink) {
        session.interval = Some(interval);
        let route = session.route();
        info!(
            "Collecting {}-day forecast for route {}",
            interval.days(),
            route.join(" -> ")
        );

        notify(sink, Reply::text(messages::collecting(interval))).await;
        session.forecast_results = self.aggregator.aggregate(&route, interval, sink).await;
        session.state = State::AwaitingFeature;

        notify(
            sink,
            Reply::with_keyboard(messages::ASK_FEATURE, Keyboard::features()),
        )
        .await;
    }

    /// Stays in `AwaitingFeature` so another feature can be picked
    async fn send_chart(&self, session: &Session, feature: Feature, sink: &dyn ReplySink) {
        let reply = match chart::build(&session.forecast_results, feature).await {
            Ok(ChartOutcome::Chart { png, caption }) => Reply::Photo {
                png,
                file_name: CHART_FILE_NAME.to_string(),
                caption,
            },
            Ok(ChartOutcome::NoData) => Reply::text(messages::NO_DATA),
            Err(e) => {
                warn!("Chart for {} failed: {e}", feature);
                Reply::text(messages::CHART_FAILED)
            }
        };
        notify(sink, reply).await;
    }
}
