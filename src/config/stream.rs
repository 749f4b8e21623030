//! Stream endpoint configuration

use serde::Deserialize;

use crate::ports::Endpoint;

use super::error::ValidationError;

/// Where the telemetry stream lives.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    /// `host[:port]` of the backend, without scheme
    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the WebSocket route
    #[serde(default = "default_path")]
    pub path: String,

    /// Deployment environment; production implies a secure channel
    #[serde(default)]
    pub environment: Environment,

    /// Forces `wss://` (true) or `ws://` (false) regardless of environment
    pub secure: Option<bool>,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl StreamConfig {
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// True if the stream should use `wss://`.
    pub fn use_secure_channel(&self) -> bool {
        self.secure.unwrap_or_else(|| self.is_production())
    }

    /// Full stream URL.
    pub fn endpoint(&self) -> Endpoint {
        let scheme = if self.use_secure_channel() { "wss" } else { "ws" };
        Endpoint::new(format!("{}://{}{}", scheme, self.host, self.path))
    }

    /// Validate stream configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::EmptyHost);
        }
        if self.host.contains("://") {
            return Err(ValidationError::HostHasScheme(self.host.clone()));
        }
        if !self.path.starts_with('/') {
            return Err(ValidationError::InvalidPath(self.path.clone()));
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            path: default_path(),
            environment: Environment::default(),
            secure: None,
        }
    }
}

fn default_host() -> String {
    "localhost:8000".to_string()
}

fn default_path() -> String {
    "/ws".to_string()
}
