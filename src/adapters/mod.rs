//! Adapters - implementations of the port traits.
//!
//! - `validation` - hand-walked JSON schema validator for telemetry payloads
//! - `websocket` - WebSocket and in-memory telemetry transports

pub mod validation;
pub mod websocket;

pub use validation::TelemetrySchemaValidator;
pub use websocket::{ChannelPeer, InMemoryTransport, ScriptedChannel, WebSocketTransport};
