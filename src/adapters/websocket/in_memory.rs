//! In-memory transport for testing.
//!
//! Each call to `open` takes the next scripted outcome: a [`ScriptedChannel`]
//! driven by its [`ChannelPeer`], an error, or a connection that never opens.
//!
//! # Security Note
//!
//! This adapter is for **testing only**. It uses `.expect()` on lock
//! operations which will panic if locks are poisoned.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::future;
use std::sync::Mutex;

use serde_json::Value;
use tokio::sync::{mpsc, watch};

use crate::ports::{Endpoint, FrameChannel, InboundFrame, TelemetryTransport, TransportError};

enum Scripted {
    Channel(ScriptedChannel),
    Fail(TransportError),
    Hang,
}

/// Transport whose connections are scripted by the test.
///
/// With nothing scripted, `open` fails with [`TransportError::Connect`].
pub struct InMemoryTransport {
    script: Mutex<VecDeque<Scripted>>,
    opened: Mutex<Vec<Endpoint>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Queue a channel for the next `open`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn push_channel(&self, channel: ScriptedChannel) {
        self.push(Scripted::Channel(channel));
    }

    /// Queue a failure for the next `open`.
    pub fn push_error(&self, error: TransportError) {
        self.push(Scripted::Fail(error));
    }

    /// Queue an `open` that never completes.
    pub fn push_hang(&self) {
        self.push(Scripted::Hang);
    }

    /// Convenience: queue a fresh channel and return its peer.
    pub fn connect_next(&self) -> ChannelPeer {
        let (channel, peer) = ScriptedChannel::pair();
        self.push_channel(channel);
        peer
    }

    /// Endpoints passed to `open`, in call order.
    pub fn opened(&self) -> Vec<Endpoint> {
        self.opened
            .lock()
            .expect("InMemoryTransport: opened lock poisoned")
            .clone()
    }

    fn push(&self, scripted: Scripted) {
        self.script
            .lock()
            .expect("InMemoryTransport: script lock poisoned")
            .push_back(scripted);
    }
}

impl Default for InMemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetryTransport for InMemoryTransport {
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameChannel>, TransportError> {
        self.opened
            .lock()
            .expect("InMemoryTransport: opened lock poisoned")
            .push(endpoint.clone());

        let next = self
            .script
            .lock()
            .expect("InMemoryTransport: script lock poisoned")
            .pop_front();

        match next {
            Some(Scripted::Channel(channel)) => Ok(Box::new(channel)),
            Some(Scripted::Fail(error)) => Err(error),
            Some(Scripted::Hang) => future::pending().await,
            None => Err(TransportError::Connect(format!(
                "no scripted connection for {}",
                endpoint
            ))),
        }
    }
}

enum PeerFrame {
    Data(InboundFrame),
    Fail(TransportError),
    Close,
}

/// Client side of a scripted connection.
pub struct ScriptedChannel {
    frames: mpsc::UnboundedReceiver<PeerFrame>,
    sent: mpsc::UnboundedSender<String>,
    closed: watch::Sender<bool>,
    finished: bool,
}

impl ScriptedChannel {
    /// A connected channel and the peer that drives it.
    pub fn pair() -> (Self, ChannelPeer) {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel();
        let (sent_tx, sent_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = watch::channel(false);

        let channel = Self {
            frames: frame_rx,
            sent: sent_tx,
            closed: closed_tx,
            finished: false,
        };
        let peer = ChannelPeer {
            frames: frame_tx,
            sent: sent_rx,
            closed: closed_rx,
        };
        (channel, peer)
    }
}

#[async_trait]
impl FrameChannel for ScriptedChannel {
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, TransportError>> {
        if self.finished {
            return None;
        }
        let frame = match self.frames.recv().await {
            Some(PeerFrame::Data(frame)) => return Some(Ok(frame)),
            Some(PeerFrame::Fail(error)) => Some(Err(error)),
            // A dropped peer counts as a clean close.
            Some(PeerFrame::Close) | None => None,
        };
        self.finished = true;
        frame
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if self.finished {
            return Err(TransportError::Channel("channel closed".to_string()));
        }
        self.sent
            .send(text)
            .map_err(|_| TransportError::Channel("peer gone".to_string()))
    }

    async fn close(&mut self) {
        self.finished = true;
        self.closed.send_replace(true);
    }
}

/// Server side of a scripted connection.
pub struct ChannelPeer {
    frames: mpsc::UnboundedSender<PeerFrame>,
    sent: mpsc::UnboundedReceiver<String>,
    closed: watch::Receiver<bool>,
}

impl ChannelPeer {
    /// Deliver a text frame. Returns false once the client side is gone.
    pub fn send_text(&self, text: impl Into<String>) -> bool {
        self.send_frame(InboundFrame::Text(text.into()))
    }

    /// Deliver a binary frame.
    pub fn send_binary(&self, bytes: impl Into<Vec<u8>>) -> bool {
        self.send_frame(InboundFrame::Binary(bytes.into()))
    }

    /// Deliver a JSON value as a text frame.
    pub fn send_json(&self, value: &Value) -> bool {
        self.send_text(value.to_string())
    }

    /// End the channel with a transport error.
    pub fn fail(&self, error: TransportError) -> bool {
        self.frames.send(PeerFrame::Fail(error)).is_ok()
    }

    /// End the channel cleanly.
    pub fn close(&self) -> bool {
        self.frames.send(PeerFrame::Close).is_ok()
    }

    fn send_frame(&self, frame: InboundFrame) -> bool {
        self.frames.send(PeerFrame::Data(frame)).is_ok()
    }

    /// Next text frame the client sent, or `None` once the channel is dropped.
    pub async fn next_sent(&mut self) -> Option<String> {
        self.sent.recv().await
    }

    /// True once the client closed its side.
    pub fn is_closed_by_client(&self) -> bool {
        *self.closed.borrow()
    }

    /// Waits until the client closes or drops its side.
    pub async fn closed_by_client(&mut self) {
        // Err means the channel was dropped, which also ends it.
        let _ = self.closed.wait_for(|closed| *closed).await;
    }
}
