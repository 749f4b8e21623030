//! Envelope codec for the telemetry stream.
//!
//! Every inbound frame is a JSON object `{type, data, isRunning?}`:
//! - `initial_data` - full state, sent once right after the channel opens
//! - `simulation_update` - full state, sent for every simulation step
//! - `simulation_stopped` - the run ended; `data` is ignored
//! - `pong` - reply to the client keepalive
//!
//! Any other `type` is tolerated and ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::telemetry::TelemetryTick;
use crate::ports::{SchemaValidationError, TelemetryValidator};

use super::StreamError;

/// The `type` tag of an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeKind {
    InitialData,
    SimulationUpdate,
    SimulationStopped,
    Pong,
    Other(String),
}

impl EnvelopeKind {
    /// Parses a wire tag.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "initial_data" => EnvelopeKind::InitialData,
            "simulation_update" => EnvelopeKind::SimulationUpdate,
            "simulation_stopped" => EnvelopeKind::SimulationStopped,
            "pong" => EnvelopeKind::Pong,
            other => EnvelopeKind::Other(other.to_string()),
        }
    }

    /// Returns the wire tag.
    pub fn as_tag(&self) -> &str {
        match self {
            EnvelopeKind::InitialData => "initial_data",
            EnvelopeKind::SimulationUpdate => "simulation_update",
            EnvelopeKind::SimulationStopped => "simulation_stopped",
            EnvelopeKind::Pong => "pong",
            EnvelopeKind::Other(tag) => tag,
        }
    }
}

/// A decoded but not yet validated envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub kind: EnvelopeKind,
    pub data: Option<Value>,
    pub is_running: Option<bool>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, rename = "isRunning")]
    is_running: Option<bool>,
}

/// Which telemetry-bearing envelope a tick arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryKind {
    Initial,
    Update,
}

/// The meaning of one inbound envelope after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// A full telemetry tick to replace the stored one.
    Telemetry {
        kind: TelemetryKind,
        tick: TelemetryTick,
        is_running: Option<bool>,
    },
    /// The simulation run ended.
    Stopped,
    /// Keepalive reply.
    Pong,
    /// Envelope type this client does not act on.
    Ignored(String),
}

impl Envelope {
    /// Decode a text frame into an envelope.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::EnvelopeParse` if the frame is not JSON, is not
    /// an object, lacks a string `type`, or carries a non-boolean `isRunning`.
    pub fn decode(text: &str) -> Result<Self, StreamError> {
        let mut value: Value =
            serde_json::from_str(text).map_err(|e| StreamError::EnvelopeParse(e.to_string()))?;
        // Taken out as-is so an explicit null stays distinguishable from absence.
        let data = match value.as_object_mut() {
            Some(object) => object.remove("data"),
            None => {
                return Err(StreamError::EnvelopeParse(
                    "envelope must be a JSON object".to_string(),
                ))
            }
        };
        let raw = RawEnvelope::deserialize(value)
            .map_err(|e| StreamError::EnvelopeParse(e.to_string()))?;

        Ok(Self {
            kind: EnvelopeKind::from_tag(&raw.kind),
            data,
            is_running: raw.is_running,
        })
    }

    /// Validate the payload according to the envelope type.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Validation` when a telemetry-bearing envelope has
    /// no `data` or its `data` fails the schema.
    pub fn interpret(
        self,
        validator: &dyn TelemetryValidator,
    ) -> Result<InboundMessage, StreamError> {
        let kind = match self.kind {
            EnvelopeKind::InitialData => TelemetryKind::Initial,
            EnvelopeKind::SimulationUpdate => TelemetryKind::Update,
            EnvelopeKind::SimulationStopped => return Ok(InboundMessage::Stopped),
            EnvelopeKind::Pong => return Ok(InboundMessage::Pong),
            EnvelopeKind::Other(tag) => return Ok(InboundMessage::Ignored(tag)),
        };

        let data = self.data.ok_or_else(|| SchemaValidationError::MissingRequired {
            field: "data".to_string(),
        })?;
        let tick = validator.validate(&data)?;

        Ok(InboundMessage::Telemetry {
            kind,
            tick,
            is_running: self.is_running,
        })
    }
}

/// Decode and validate a text frame in one step.
pub fn read_frame(
    text: &str,
    validator: &dyn TelemetryValidator,
) -> Result<InboundMessage, StreamError> {
    Envelope::decode(text)?.interpret(validator)
}

/// Decode and validate a binary frame, which must hold UTF-8 JSON.
pub fn read_binary_frame(
    bytes: &[u8],
    validator: &dyn TelemetryValidator,
) -> Result<InboundMessage, StreamError> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        StreamError::EnvelopeParse(format!("binary frame is not valid UTF-8: {}", e))
    })?;
    read_frame(text, validator)
}

/// Messages the client sends to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Application-level keepalive.
    Ping,
}

impl ClientMessage {
    /// Encode as a text frame.
    pub fn to_text(&self) -> String {
        match self {
            ClientMessage::Ping => r#"{"type":"ping"}"#.to_string(),
        }
    }
}
