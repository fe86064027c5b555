//! Shared error types for the gate

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gate operations
#[derive(Debug, Error)]
pub enum Error {
    /// No threshold is registered for the metric
    #[error("Unknown metric: {metric}")]
    UnknownMetric { metric: String },

    /// A record is missing required identity fields
    #[error("Malformed record {unit}: {reason}")]
    MalformedRecord { unit: String, reason: String },

    /// A threshold violates `green_max <= yellow_max`
    #[error("Invalid threshold for {metric}: green_max {green_max} exceeds yellow_max {yellow_max}")]
    InvalidThreshold {
        metric: String,
        green_max: u32,
        yellow_max: u32,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        path: Option<PathBuf>,
    },

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn unknown_metric(metric: impl Into<String>) -> Self {
        Self::UnknownMetric {
            metric: metric.into(),
        }
    }

    pub fn malformed(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error, optionally tied to a config file
    pub fn configuration(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Configuration {
            message: message.into(),
            path,
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
