//! Error types for the estimation engine

use std::fmt::Display;
use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown GPU model: {model} (supply a custom TDP or a catalog model id)")]
    UnknownGpuModel { model: String },

    #[error("Invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No candidate regions supplied for ranking")]
    NoCandidateRegions,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build an `InvalidParameter` naming the offending field and value
    pub fn invalid(field: impl Into<String>, value: impl Display, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Require a finite, strictly positive number
pub(crate) fn require_positive(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid(field, value, "must be a finite number greater than zero"))
    }
}

/// Require a finite number within `[min, max]`
pub(crate) fn require_range(field: &str, value: f64, min: f64, max: f64) -> Result<f64> {
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(Error::invalid(field, value, format!("must be within [{}, {}]", min, max)))
    }
}
