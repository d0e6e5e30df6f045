//! Per-point forecast collection along a route, tolerant of single point failures

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::conversation::messages;
use crate::conversation::{Reply, ReplySink};
use crate::models::{Interval, PointForecast};
use crate::weather::WeatherProvider;

pub struct ForecastAggregator {
    provider: Arc<dyn WeatherProvider>,
}

impl ForecastAggregator {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    /// Query every route point in order, one at a time.
    ///
    /// A point that cannot be resolved or forecast is reported to the chat and
    /// skipped; it never aborts the pass. Each successful point is summarised to
    /// the chat as soon as it arrives. The result keeps route order minus the
    /// skipped points, with at most `interval` days per point.
    #[instrument(skip(self, points, sink), fields(points = points.len(), provider = self.provider.name()))]
    pub async fn aggregate(
        &self,
        points: &[String],
        interval: Interval,
        sink: &dyn ReplySink,
    ) -> Vec<PointForecast> {
        let days = interval.days();
        let mut results = Vec::with_capacity(points.len());

        for point in points {
            let location = match self.provider.resolve(point).await {
                Ok(Some(location)) => location,
                Ok(None) => {
                    info!("No location found for '{}'", point);
                    notify(sink, Reply::text(messages::location_not_found(point))).await;
                    continue;
                }
                Err(e) => {
                    warn!("Failed to resolve '{}': {e}", point);
                    notify(sink, Reply::text(messages::location_not_found(point))).await;
                    continue;
                }
            };

            let mut records = match self.provider.forecast(&location, days).await {
                Ok(records) if !records.is_empty() => records,
                Ok(_) => {
                    warn!("Empty forecast for '{}' ({})", point, location);
                    notify(sink, Reply::text(messages::forecast_unavailable(point))).await;
                    continue;
                }
                Err(e) => {
                    warn!("Forecast for '{}' ({}) failed: {e}", point, location);
                    notify(sink, Reply::text(messages::forecast_unavailable(point))).await;
                    continue;
                }
            };
            records.truncate(usize::from(days));
            debug!("Got {} forecast days for '{}'", records.len(), point);

            let forecast = PointForecast::new(point.clone(), records);
            notify(sink, Reply::text(summary(&forecast, interval))).await;
            results.push(forecast);
        }

        info!(
            "Collected forecasts for {}/{} route points",
            results.len(),
            points.len()
        );
        results
    }
}

/// Per-point text: header, then one block per day
fn summary(forecast: &PointForecast, interval: Interval) -> String {
    let mut text = messages::forecast_header(forecast.point(), interval);
    for record in forecast.records() {
        text.push_str(&record.format_summary());
        text.push('\n');
    }
    text
}

/// Deliver a reply; delivery failures are logged and otherwise ignored
pub(crate) async fn notify(sink: &dyn ReplySink, reply: Reply) {
    if let Err(e) = sink.send(reply).await {
        warn!("Failed to deliver reply: {e}");
    }
}
