//! Configuration management for the `RouteCast` bot
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RouteCastError;
use crate::weather::{accuweather, open_meteo};
use ::config::{Config, Environment, File, FileFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `RouteCast` bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteCastConfig {
    /// Telegram Bot API configuration
    #[serde(default)]
    pub telegram: TelegramConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram Bot API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by @BotFather
    pub bot_token: Option<String>,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,
    /// Long-poll timeout for getUpdates in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_seconds: u32,
    /// Chat sessions untouched for this many hours are forgotten
    #[serde(default = "default_session_idle_hours")]
    pub session_idle_hours: u32,
}

/// Which weather service backs the forecasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenMeteo,
    AccuWeather,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather service to query
    #[serde(default)]
    pub provider: ProviderKind,
    /// API key (required for AccuWeather, unused by OpenMeteo)
    pub api_key: Option<String>,
    /// Base URL override; the provider default is used when unset
    pub base_url: Option<String>,
    /// Language of place names and descriptions
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache weather responses on disk
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Cache directory location
    pub location: Option<String>,
    /// How long resolved place names stay cached
    #[serde(default = "default_location_ttl")]
    pub location_ttl_hours: u32,
    /// How long forecasts stay cached
    #[serde(default = "default_forecast_ttl")]
    pub forecast_ttl_minutes: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u32 {
    30
}

fn default_session_idle_hours() -> u32 {
    24
}

fn default_language() -> String {
    "ru".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_cache_enabled() -> bool {
    true
}

fn default_location_ttl() -> u32 {
    168
}

fn default_forecast_ttl() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: default_telegram_api_url(),
            poll_timeout_seconds: default_poll_timeout(),
            session_idle_hours: default_session_idle_hours(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            base_url: None,
            language: default_language(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            location: None,
            location_ttl_hours: default_location_ttl(),
            forecast_ttl_minutes: default_forecast_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WeatherConfig {
    /// Configured base URL, or the default of the selected provider
    #[must_use]
    pub fn base_url(&self) -> String {
        match (&self.base_url, self.provider) {
            (Some(url), _) if !url.is_empty() => url.clone(),
            (_, ProviderKind::AccuWeather) => accuweather::DEFAULT_BASE_URL.to_string(),
            (_, ProviderKind::OpenMeteo) => open_meteo::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CacheConfig {
    /// Cache directory: the configured location or `<cache_dir>/routecast`
    pub fn path(&self) -> Result<PathBuf> {
        match &self.location {
            Some(location) if !location.is_empty() => Ok(PathBuf::from(location)),
            _ => dirs::cache_dir()
                .map(|dir| dir.join("routecast"))
                .ok_or_else(|| RouteCastError::config("Unable to determine cache directory").into()),
        }
    }
}

impl RouteCastConfig {
    /// Load configuration from `config_path` (or the default location) and
    /// `ROUTECAST_*` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. ROUTECAST_TELEGRAM__BOT_TOKEN
        builder = builder.add_source(
            Environment::with_prefix("ROUTECAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RouteCastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        config.validate()?;
        config.validate_credentials()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("routecast").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.telegram.api_base_url.is_empty() {
            self.telegram.api_base_url = default_telegram_api_url();
        }
        if self.telegram.poll_timeout_seconds == 0 {
            self.telegram.poll_timeout_seconds = default_poll_timeout();
        }
        if self.telegram.session_idle_hours == 0 {
            self.telegram.session_idle_hours = default_session_idle_hours();
        }
        if self.weather.language.is_empty() {
            self.weather.language = default_language();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.cache.location_ttl_hours == 0 {
            self.cache.location_ttl_hours = default_location_ttl();
        }
        if self.cache.forecast_ttl_minutes == 0 {
            self.cache.forecast_ttl_minutes = default_forecast_ttl();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all non-secret configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the bot token and provider API key
    pub fn validate_credentials(&self) -> Result<()> {
        match self.telegram.bot_token.as_deref() {
            None | Some("") => {
                return Err(RouteCastError::config(
                    "Telegram bot token is missing. Set telegram.bot_token or ROUTECAST_TELEGRAM__BOT_TOKEN.",
                )
                .into());
            }
            Some(token) if !token.contains(':') => {
                return Err(RouteCastError::config(
                    "Telegram bot token appears to be invalid (expected '<id>:<secret>').",
                )
                .into());
            }
            Some(_) => {}
        }

        if self.weather.provider == ProviderKind::AccuWeather {
            match self.weather.api_key.as_deref() {
                None | Some("") => {
                    return Err(RouteCastError::config(
                        "AccuWeather requires weather.api_key (ROUTECAST_WEATHER__API_KEY).",
                    )
                    .into());
                }
                Some(key) if key.len() < 8 => {
                    return Err(RouteCastError::config(
                        "Weather API key appears to be invalid (too short). Please check your API key.",
                    )
                    .into());
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                RouteCastError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(RouteCastError::config("Weather API max retries cannot exceed 10").into());
        }

        if self.telegram.poll_timeout_seconds > 50 {
            return Err(
                RouteCastError::config("Telegram poll timeout cannot exceed 50 seconds").into(),
            );
        }

        if self.telegram.session_idle_hours > 720 {
            return Err(
                RouteCastError::config("Session idle timeout cannot exceed 720 hours (30 days)")
                    .into(),
            );
        }

        if self.cache.location_ttl_hours > 720 {
            return Err(
                RouteCastError::config("Location cache TTL cannot exceed 720 hours (30 days)")
                    .into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RouteCastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RouteCastError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather API base URL", self.weather.base_url()),
            ("Telegram API base URL", self.telegram.api_base_url.clone()),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RouteCastError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
