//! Stream domain - envelopes, the connection state machine, and errors.
//!
//! # Flow
//!
//! ```text
//! text frame ──► Envelope::decode ──► Envelope::interpret ──► InboundMessage
//!                                                                   │
//!                  StreamEvent::Inbound { attempt, outcome } ◄──────┘
//!                                    │
//!                                    ▼
//!                 TelemetrySnapshot::apply ──► next TelemetrySnapshot
//! ```

mod envelope;
mod errors;
mod link_state;
mod state;

pub use envelope::{
    read_binary_frame, read_frame, ClientMessage, Envelope, EnvelopeKind, InboundMessage, TelemetryKind,
};
pub use errors::StreamError;
pub use link_state::LinkState;
pub use state::{AttemptId, ConnectionState, StreamEvent, TelemetryRecord, TelemetrySnapshot};
