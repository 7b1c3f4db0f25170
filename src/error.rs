//! Error types for pebble-pi.
//!
//! All fallible operations return `Result<T, PiError>` instead of panicking.
//! The single deliberate panic in the crate is the estimator's `throws > 0`
//! contract, which configuration validation makes unreachable.

use thiserror::Error;

/// Result type alias for pebble-pi operations.
pub type PiResult<T> = Result<T, PiError>;

/// Unified error type for all pebble-pi operations.
#[derive(Debug, Error)]
pub enum PiError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Field validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File or terminal I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Visualization Errors =====
    /// Rendering surface failed.
    #[error("Render error: {0}")]
    Render(String),
}

impl PiError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Whether the error was raised before sampling could start.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::YamlParse(_) | Self::Validation(_)
        )
    }
}
