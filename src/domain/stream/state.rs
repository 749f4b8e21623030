//! Connection and telemetry state records, and the transitions between them.
//!
//! State is never mutated in place. Each accepted [`StreamEvent`] produces a
//! new [`TelemetrySnapshot`] with a version one higher than its predecessor;
//! rejected events produce nothing.

use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::{StateMachine, Timestamp};
use crate::domain::telemetry::TelemetryTick;

use super::{InboundMessage, LinkState, StreamError};

/// Sequence number of a connection attempt. Each `connect` gets a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AttemptId(u64);

impl AttemptId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The attempt after this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connection, run and error status, replaced as one record per transition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionState {
    pub link: LinkState,
    pub attempt: AttemptId,
    pub is_connected: bool,
    pub is_running: bool,
    pub last_error: Option<StreamError>,
}

/// The last valid tick and the attempt it arrived on.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub tick: TelemetryTick,
    pub attempt: AttemptId,
    pub received_at: Timestamp,
}

impl TelemetryRecord {
    /// How long ago the tick arrived.
    pub fn age(&self, now: Timestamp) -> chrono::Duration {
        now.duration_since(&self.received_at)
    }
}

/// Everything a rendering consumer reads, as one immutable value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TelemetrySnapshot {
    pub version: u64,
    pub connection: ConnectionState,
    pub telemetry: Option<Arc<TelemetryRecord>>,
}

/// Inputs to the state machine, each tagged with the attempt it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    ConnectStarted {
        attempt: AttemptId,
    },
    HandshakeCompleted {
        attempt: AttemptId,
    },
    Inbound {
        attempt: AttemptId,
        outcome: Result<InboundMessage, StreamError>,
    },
    /// `error` is `None` for a clean close.
    Closed {
        attempt: AttemptId,
        error: Option<StreamError>,
    },
}

impl StreamEvent {
    pub fn attempt(&self) -> AttemptId {
        match self {
            StreamEvent::ConnectStarted { attempt }
            | StreamEvent::HandshakeCompleted { attempt }
            | StreamEvent::Inbound { attempt, .. }
            | StreamEvent::Closed { attempt, .. } => *attempt,
        }
    }
}

impl TelemetrySnapshot {
    /// Last valid tick, even if it came from an earlier or closed attempt.
    pub fn tick(&self) -> Option<&TelemetryTick> {
        self.telemetry.as_deref().map(|record| &record.tick)
    }

    /// Tick received on the current attempt while it is still connected.
    pub fn live_tick(&self) -> Option<&TelemetryTick> {
        self.telemetry
            .as_deref()
            .filter(|record| {
                record.attempt == self.connection.attempt && self.connection.is_connected
            })
            .map(|record| &record.tick)
    }

    /// True if frames from `attempt` may still change state.
    pub fn accepts_frames_from(&self, attempt: AttemptId) -> bool {
        attempt == self.connection.attempt && self.connection.link == LinkState::Connected
    }

    /// Apply one event, returning the successor snapshot.
    ///
    /// Returns `None` when the event is stale, invalid for the current link
    /// state, or has no observable effect.
    pub fn apply(&self, event: StreamEvent, now: Timestamp) -> Option<Self> {
        let current = &self.connection;

        let (connection, telemetry) = match event {
            StreamEvent::ConnectStarted { attempt } => {
                if attempt <= current.attempt {
                    return None;
                }
                let link = current.link.transition_to(LinkState::Connecting).ok()?;
                let connection = ConnectionState {
                    link,
                    attempt,
                    is_connected: false,
                    is_running: false,
                    last_error: current.last_error.clone(),
                };
                (connection, self.telemetry.clone())
            }

            StreamEvent::HandshakeCompleted { attempt } => {
                if attempt != current.attempt {
                    return None;
                }
                let link = current.link.transition_to(LinkState::Connected).ok()?;
                let connection = ConnectionState {
                    link,
                    is_connected: true,
                    last_error: None,
                    ..current.clone()
                };
                (connection, self.telemetry.clone())
            }

            StreamEvent::Inbound { attempt, outcome } => {
                if !self.accepts_frames_from(attempt) {
                    return None;
                }
                match outcome {
                    Ok(InboundMessage::Telemetry {
                        tick, is_running, ..
                    }) => {
                        let connection = ConnectionState {
                            is_connected: true,
                            is_running: is_running.unwrap_or(current.is_running),
                            last_error: None,
                            ..current.clone()
                        };
                        let record = TelemetryRecord {
                            tick,
                            attempt,
                            received_at: now,
                        };
                        (connection, Some(Arc::new(record)))
                    }
                    Ok(InboundMessage::Stopped) => {
                        let connection = ConnectionState {
                            is_running: false,
                            last_error: None,
                            ..current.clone()
                        };
                        (connection, self.telemetry.clone())
                    }
                    Ok(InboundMessage::Pong) | Ok(InboundMessage::Ignored(_)) => return None,
                    Err(error) => {
                        let connection = ConnectionState {
                            last_error: Some(error),
                            ..current.clone()
                        };
                        (connection, self.telemetry.clone())
                    }
                }
            }

            StreamEvent::Closed { attempt, error } => {
                if attempt != current.attempt {
                    return None;
                }
                let link = current.link.transition_to(LinkState::Disconnected).ok()?;
                let connection = ConnectionState {
                    link,
                    attempt,
                    is_connected: false,
                    is_running: false,
                    last_error: error.or_else(|| current.last_error.clone()),
                };
                (connection, self.telemetry.clone())
            }
        };

        Some(Self {
            version: self.version + 1,
            connection,
            telemetry,
        })
    }
}
