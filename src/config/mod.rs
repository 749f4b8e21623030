//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRAFFIC_TELEMETRY` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working setup
//! pointed at `ws://localhost:8000/ws`.
//!
//! # Example
//!
//! ```no_run
//! use traffic_telemetry::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Streaming from {}", config.stream.endpoint());
//! ```

mod client;
mod error;
mod logging;
mod stream;

pub use client::ClientConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use stream::{Environment, StreamConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Stream endpoint (host, path, secure channel selection)
    #[serde(default)]
    pub stream: StreamConfig,

    /// Client queues and timers
    #[serde(default)]
    pub client: ClientConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TRAFFIC_TELEMETRY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TRAFFIC_TELEMETRY__STREAM__HOST=sim.local:8000` -> `stream.host = sim.local:8000`
    /// - `TRAFFIC_TELEMETRY__CLIENT__KEEPALIVE_SECS=0` -> `client.keepalive_secs = 0`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRAFFIC_TELEMETRY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.stream.validate()?;
        self.client.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }
}
