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
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout (expected 1-600 seconds)")]
    InvalidTimeout,

    #[error("Invalid max_tokens (expected 1-8192)")]
    InvalidMaxTokens,

    #[error("Invalid temperature (expected 0.0-2.0)")]
    InvalidTemperature,

    #[error("Preamble override cannot be blank")]
    EmptyPreamble,
}
