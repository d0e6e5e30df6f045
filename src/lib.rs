//! `RouteCast` - weather along a travel route, delivered over Telegram
//!
//! This library provides the conversation state machine that collects a route,
//! the forecast aggregation across route points, and the chart rendering of a
//! chosen weather metric.

pub mod aggregator;
pub mod bot;
pub mod cache;
pub mod chart;
pub mod config;
pub mod conversation;
pub mod error;
pub mod logging;
pub mod models;
pub mod route;
pub mod telegram;
pub mod weather;

// Re-export core types for public API
pub use aggregator::ForecastAggregator;
pub use chart::{ChartData, ChartError, ChartOutcome, Series};
pub use config::RouteCastConfig;
pub use conversation::{
    ChatId, ConversationMachine, Event, Reply, ReplySink, Selection, Session, SessionStore, State,
};
pub use error::RouteCastError;
pub use models::{Feature, ForecastRecord, Interval, PointForecast};
pub use route::RouteBuilder;
pub use weather::{LocationId, ProviderError, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, RouteCastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
