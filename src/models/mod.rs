//! Data models for the RouteCast application
//!
//! This module contains the core domain models organized by concern:
//! - Forecast: one day of weather for one route point, and per-point collections
//! - Feature: the weather metric a chart compares across points
//! - Interval: the forecast horizon a user may request

pub mod feature;
pub mod forecast;
pub mod interval;

// Re-export all public types for convenient access
pub use feature::Feature;
pub use forecast::{ForecastRecord, PointForecast};
pub use interval::Interval;
