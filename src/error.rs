//! Error types for Gesture Flux
//!
//! Classification itself never fails: a malformed or ambiguous frame degrades
//! to "no gesture". Errors only surface when loading configuration, parsing
//! frame input, persisting engine state, or encoding output.

use thiserror::Error;

/// Errors that can occur around the classification core
#[derive(Debug, Error)]
pub enum GestureError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

/// Precondition violations detected when a configuration is loaded
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 180] degrees, got {value}")]
    AngleOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be an angle margin within [0, 180] degrees, got {value}")]
    InvalidMargin { field: &'static str, value: f64 },

    #[error("{field} must be a non-negative distance, got {value}")]
    InvalidDistance { field: &'static str, value: f64 },

    #[error("distance_scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    #[error("{field} must be a non-negative number of seconds, got {value}")]
    InvalidCooldown { field: &'static str, value: f64 },

    #[error("screen dimensions must be non-zero, got {width}x{height}")]
    InvalidScreen { width: u32, height: u32 },
}
