//! Connection status badge and error banner.

use serde::Serialize;
use std::fmt;

use crate::domain::stream::{ConnectionState, LinkState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBadge {
    Connecting,
    /// Connected and the simulation is running.
    Live,
    /// Connected but the simulation is stopped.
    Idle,
    Offline,
}

impl StatusBadge {
    pub fn from_connection(connection: &ConnectionState) -> Self {
        match connection.link {
            LinkState::Connecting => StatusBadge::Connecting,
            LinkState::Connected if connection.is_running => StatusBadge::Live,
            LinkState::Connected => StatusBadge::Idle,
            LinkState::Disconnected => StatusBadge::Offline,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBadge::Connecting => "connecting",
            StatusBadge::Live => "live",
            StatusBadge::Idle => "idle",
            StatusBadge::Offline => "offline",
        }
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text for the transient error banner, if any.
pub fn banner(connection: &ConnectionState) -> Option<String> {
    connection.last_error.as_ref().map(ToString::to_string)
}
