//! Comparison chart of one weather feature across all route points

use std::sync::OnceLock;

use chrono::{Duration, NaiveDate};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use thiserror::Error;
use tokio::task;
use tracing::{debug, instrument};

use crate::conversation::messages;
use crate::models::{Feature, PointForecast};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;

static FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to load chart font: {0}")]
    Font(String),

    #[error("Failed to draw chart: {0}")]
    Render(String),

    #[error("Failed to encode chart as PNG: {0}")]
    Encode(String),

    #[error("Chart rendering task failed: {0}")]
    Join(String),
}

/// One line on the chart: a route point and its (date, value) pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// Everything needed to draw a chart, independent of the drawing backend
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub feature: Feature,
    pub title: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// Nothing was forecast, so there is nothing to draw
    NoData,
    Chart { png: Vec<u8>, caption: String },
}

/// Reshape forecasts into one series per route point; `None` when there are none
#[must_use]
pub fn series(results: &[PointForecast], feature: Feature) -> Option<ChartData> {
    if results.is_empty() {
        return None;
    }

    let series = results
        .iter()
        .map(|forecast| Series {
            label: forecast.point().to_string(),
            points: forecast
                .dates()
                .iter()
                .copied()
                .zip(forecast.values(feature))
                .collect(),
        })
        .collect();

    Some(ChartData {
        feature,
        title: messages::chart_caption(feature),
        y_label: feature.axis_label(),
        series,
    })
}

/// Make the bundled font plotters' sans-serif family. Registers once per process.
fn ensure_font() -> Result<(), ChartError> {
    static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();
    REGISTERED
        .get_or_init(|| {
            register_font("sans-serif", FontStyle::Normal, FONT).map_err(|_| "InvalidFont".to_string())
        })
        .clone()
        .map_err(ChartError::Font)
}

/// Draw the chart into an in-memory PNG. Same data, same bytes.
pub fn render(data: &ChartData) -> Result<Vec<u8>, ChartError> {
    ensure_font()?;

    let all_points = || data.series.iter().flat_map(|s| s.points.iter());

    let first_day = all_points()
        .map(|(date, _)| *date)
        .min()
        .ok_or_else(|| ChartError::Render("chart has no points".into()))?;
    let last_offset = all_points()
        .map(|(date, _)| (*date - first_day).num_days())
        .max()
        .unwrap_or(0);

    let (y_min, y_max) = all_points().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| {
        (lo.min(*v), hi.max(*v))
    });
    let padding = if y_max > y_min {
        (y_max - y_min) * 0.1
    } else {
        1.0
    };

    let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&data.title, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(70)
            .build_cartesian_2d(
                -0.5..(last_offset as f64 + 0.5),
                (y_min - padding)..(y_max + padding),
            )
            .map_err(render_error)?;

        // day offsets on x; label whole days only
        let x_label = |x: &f64| {
            if (x - x.round()).abs() > 1e-6 {
                return String::new();
            }
            (first_day + Duration::days(x.round() as i64))
                .format("%Y-%m-%d")
                .to_string()
        };

        chart
            .configure_mesh()
            .x_desc("Дата")
            .y_desc(&data.y_label)
            .x_labels(usize::try_from(last_offset).unwrap_or(0) + 2)
            .x_label_formatter(&x_label)
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()
            .map_err(render_error)?;

        for (index, series) in data.series.iter().enumerate() {
            let (r, g, b) = Palette99::pick(index).rgb();
            let color = RGBColor(r, g, b);
            let points = series
                .points
                .iter()
                .map(|(date, value)| ((*date - first_day).num_days() as f64, *value));

            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)).point_size(3))
                .map_err(render_error)?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(&buffer, WIDTH, HEIGHT, ExtendedColorType::Rgb8)
        .map_err(|e| ChartError::Encode(e.to_string()))?;
    Ok(png)
}

fn render_error<E: std::error::Error + Send + Sync>(
    err: plotters::drawing::DrawingAreaErrorKind<E>,
) -> ChartError {
    ChartError::Render(err.to_string())
}

/// Build the chart for `feature`, rendering on the blocking pool
#[instrument(skip(results), fields(points = results.len()))]
pub async fn build(results: &[PointForecast], feature: Feature) -> Result<ChartOutcome, ChartError> {
    let Some(data) = series(results, feature) else {
        debug!("No forecasts to chart");
        return Ok(ChartOutcome::NoData);
    };

    let caption = data.title.clone();
    let png = task::spawn_blocking(move || render(&data))
        .await
        .map_err(|e| ChartError::Join(e.to_string()))??;

    debug!("Rendered {} byte chart", png.len());
    Ok(ChartOutcome::Chart { png, caption })
}
