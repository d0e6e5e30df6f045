//! Tracing subscriber setup

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the filter: a valid `rust_log` wins, then the CLI override, then the configured level
fn env_filter(
    config: &LoggingConfig,
    level_override: Option<&str>,
    rust_log: Option<&str>,
) -> Result<EnvFilter> {
    if let Some(Ok(filter)) = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .map(EnvFilter::try_new)
    {
        return Ok(filter);
    }

    let level = level_override.unwrap_or(&config.level);
    // Quiet the HTTP stack unless explicitly asked for
    let directives = format!("{level},hyper=warn,reqwest=warn,fjall=warn,lsm_tree=warn");
    EnvFilter::try_new(&directives).map_err(|e| anyhow!("Invalid log level '{level}': {e}"))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &LoggingConfig, level_override: Option<&str>) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = env_filter(config, level_override, rust_log.as_deref())?;

    let installed = match config.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
    };

    installed.map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_from_config_level() {
        let config = LoggingConfig::default();
        let filter = env_filter(&config, None, None).unwrap();
        assert!(filter.to_string().contains("info"));
        assert!(filter.to_string().contains("hyper=warn"));
    }

    #[test]
    fn test_override_wins_over_config() {
        let config = LoggingConfig::default();
        let filter = env_filter(&config, Some("debug"), None).unwrap();
        assert!(filter.to_string().contains("debug"));
    }

    #[test]
    fn test_rust_log_wins_over_override() {
        let config = LoggingConfig::default();
        let filter = env_filter(&config, Some("debug"), Some("routecast=trace")).unwrap();
        assert!(filter.to_string().contains("routecast=trace"));
        assert!(!filter.to_string().contains("hyper=warn"));
    }

    #[test]
    fn test_blank_or_invalid_rust_log_is_ignored() {
        let config = LoggingConfig::default();
        for rust_log in ["", "  ", "routecast=shouting"] {
            let filter = env_filter(&config, None, Some(rust_log)).unwrap();
            assert!(filter.to_string().contains("hyper=warn"), "{rust_log:?}");
        }
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig::default();
        assert!(env_filter(&config, Some("routecast=shouting"), None).is_err());
    }
}
