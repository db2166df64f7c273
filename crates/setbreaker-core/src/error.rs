//! Core error types for setbreaker-core.
//!
//! The timer itself never fails; everything fallible lives around the
//! preferences store, so the hierarchy is small.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for setbreaker-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load preferences from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save preferences to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key is not one of the known preference keys
    #[error("Unknown preference key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Rest period outside the allowed stepper range
    #[error("Rest period {secs}s must be between {min}s and {max}s in steps of {step}s")]
    RestPeriod { secs: u32, min: u32, max: u32, step: u32 },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
