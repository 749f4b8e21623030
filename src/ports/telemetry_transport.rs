//! Telemetry Transport Port - One duplex text channel to the telemetry backend.
//!
//! The stream client never touches sockets directly. It asks a transport to
//! open a [`FrameChannel`] for an [`Endpoint`] and then pulls text frames
//! from it one at a time.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Address of the telemetry stream (`ws://host/ws` or `wss://host/ws`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Create an endpoint from a full URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Get the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `wss://` endpoints.
    pub fn is_secure(&self) -> bool {
        self.0.starts_with("wss://")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The channel could not be opened.
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Opening the channel took longer than allowed.
    #[error("Connection timed out after {0}s")]
    Timeout(u64),

    /// The open channel failed while reading or writing.
    #[error("Channel error: {0}")]
    Channel(String),
}

/// A data frame received from the peer.
///
/// Binary frames are passed up undecoded so the reader can report bytes that
/// are not UTF-8 instead of losing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary(Vec<u8>),
}

/// An open duplex channel delivering data frames.
#[async_trait]
pub trait FrameChannel: Send {
    /// Wait for the next data frame.
    ///
    /// Returns `None` once the peer closed the channel cleanly.
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, TransportError>>;

    /// Send a text frame to the peer.
    async fn send_text(&mut self, text: String) -> Result<(), TransportError>;

    /// Close the channel, sending a close frame where the protocol has one.
    async fn close(&mut self);
}

/// Port for opening telemetry channels.
///
/// Implementations should:
/// - Complete the protocol handshake before returning
/// - Hide control frames (ping/pong) from the caller
/// - Report an unexpected disconnect as an error, not a clean close
#[async_trait]
pub trait TelemetryTransport: Send + Sync {
    /// Open a channel to the endpoint.
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameChannel>, TransportError>;
}
