//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the telemetry core and the outside world. Adapters implement these ports.
//!
//! - `TelemetryTransport` / `FrameChannel` - the duplex stream to the backend
//! - `TelemetryValidator` - schema validation of envelope payloads

mod telemetry_transport;
mod telemetry_validator;

pub use telemetry_transport::{
    Endpoint, FrameChannel, InboundFrame, TelemetryTransport, TransportError,
};
pub use telemetry_validator::{SchemaValidationError, TelemetryValidator};
