//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Unknown template preset: {0}")]
    UnknownPreset(String),

    #[error("Maximum tree depth must be at least 1")]
    InvalidTreeDepth,

    #[error("Invalid log filter: {0}")]
    InvalidLogLevel(String),
}
