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
    #[error("Stream host must not be empty")]
    EmptyHost,

    #[error("Stream host must not include a scheme: {0}")]
    HostHasScheme(String),

    #[error("Stream path must start with '/': {0}")]
    InvalidPath(String),

    #[error("Queue capacity must be between 1 and {max}: {field}")]
    InvalidCapacity { field: &'static str, max: usize },

    #[error("Connect timeout must be between 1 and 120 seconds")]
    InvalidConnectTimeout,

    #[error("Keepalive interval must be at most 3600 seconds")]
    InvalidKeepalive,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
