//! WebSocket adapters for the telemetry stream.
//!
//! - [`WebSocketTransport`] - real connections via `tokio-tungstenite`
//! - [`InMemoryTransport`] - scripted connections for tests

mod in_memory;
mod tungstenite_transport;

pub use in_memory::{ChannelPeer, InMemoryTransport, ScriptedChannel};
pub use tungstenite_transport::WebSocketTransport;
