//! Client actor configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_CAPACITY: usize = 65_536;

/// Queue sizes and timers for the telemetry client.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Capacity of the command queue (connect/disconnect/shutdown)
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Capacity of the queue between a connection reader and the actor
    #[serde(default = "default_inbound_capacity")]
    pub inbound_capacity: usize,

    /// Upper bound on opening the channel, in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Interval between keepalive pings, in seconds; 0 disables them
    #[serde(default = "default_keepalive")]
    pub keepalive_secs: u64,
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn keepalive(&self) -> Option<Duration> {
        (self.keepalive_secs > 0).then(|| Duration::from_secs(self.keepalive_secs))
    }

    /// Validate client configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("command_capacity", self.command_capacity),
            ("inbound_capacity", self.inbound_capacity),
        ] {
            if value == 0 || value > MAX_CAPACITY {
                return Err(ValidationError::InvalidCapacity {
                    field,
                    max: MAX_CAPACITY,
                });
            }
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 120 {
            return Err(ValidationError::InvalidConnectTimeout);
        }
        if self.keepalive_secs > 3600 {
            return Err(ValidationError::InvalidKeepalive);
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            command_capacity: default_command_capacity(),
            inbound_capacity: default_inbound_capacity(),
            connect_timeout_secs: default_connect_timeout(),
            keepalive_secs: default_keepalive(),
        }
    }
}

fn default_command_capacity() -> usize {
    16
}

fn default_inbound_capacity() -> usize {
    256
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_keepalive() -> u64 {
    30
}
