//! Stream error taxonomy.
//!
//! Every variant is recoverable. Errors are surfaced by storing them as the
//! `last_error` of the connection state; none of them stops the client.

use thiserror::Error;

use crate::ports::{SchemaValidationError, TransportError};

/// Errors observed while consuming the telemetry stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// The channel failed to open or dropped unexpectedly.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// A frame could not be decoded into the `{type, data, isRunning?}` envelope.
    #[error("Invalid envelope: {0}")]
    EnvelopeParse(String),

    /// The envelope decoded but its payload violates the telemetry schema.
    #[error("Invalid telemetry payload: {0}")]
    Validation(#[from] SchemaValidationError),
}

impl StreamError {
    /// Short machine-readable category, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            StreamError::Transport(_) => "transport",
            StreamError::EnvelopeParse(_) => "envelope_parse",
            StreamError::Validation(_) => "validation",
        }
    }
}
