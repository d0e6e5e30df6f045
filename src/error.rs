//! Error types and handling for the `RouteCast` application

use thiserror::Error;

/// Main error type for the `RouteCast` application
#[derive(Error, Debug)]
pub enum RouteCastError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors (commands, button payloads, intervals)
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Chat transport errors (Telegram Bot API)
    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl RouteCastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for RouteCastError {
    fn from(err: reqwest::Error) -> Self {
        RouteCastError::transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = RouteCastError::config("missing bot token");
        assert!(matches!(config_err, RouteCastError::Config { .. }));

        let validation_err = RouteCastError::validation("interval:7");
        assert!(matches!(validation_err, RouteCastError::Validation { .. }));

        let transport_err = RouteCastError::transport("getUpdates failed");
        assert!(matches!(transport_err, RouteCastError::Transport { .. }));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RouteCastError::config("missing bot token").to_string(),
            "Configuration error: missing bot token"
        );
        assert_eq!(
            RouteCastError::validation("unknown feature 'snow'").to_string(),
            "Invalid input: unknown feature 'snow'"
        );
    }
}
