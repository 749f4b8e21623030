//! WebSocket transport over `tokio-tungstenite`.
//!
//! Text and binary frames pass through unchanged; decoding binary payloads
//! is left to the reader. Protocol ping/pong is answered by the library and never
//! reaches the caller. A close frame from the server ends the channel
//! cleanly; the stream ending without one is reported as an error.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::ports::{Endpoint, FrameChannel, InboundFrame, TelemetryTransport, TransportError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Opens telemetry channels as WebSocket connections.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TelemetryTransport for WebSocketTransport {
    async fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn FrameChannel>, TransportError> {
        let (stream, response) = connect_async(endpoint.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::debug!(
            endpoint = %endpoint,
            status = response.status().as_u16(),
            "WebSocket handshake complete"
        );

        Ok(Box::new(WebSocketChannel {
            stream,
            closed: false,
        }))
    }
}

struct WebSocketChannel {
    stream: WsStream,
    closed: bool,
}

#[async_trait]
impl FrameChannel for WebSocketChannel {
    async fn next_frame(&mut self) -> Option<Result<InboundFrame, TransportError>> {
        if self.closed {
            return None;
        }

        loop {
            let message = match self.stream.next().await {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    self.closed = true;
                    return Some(Err(channel_error(e)));
                }
                None => {
                    self.closed = true;
                    return Some(Err(TransportError::Channel(
                        "stream ended without close frame".to_string(),
                    )));
                }
            };

            match message {
                Message::Text(text) => return Some(Ok(InboundFrame::Text(text))),
                Message::Binary(bytes) => return Some(Ok(InboundFrame::Binary(bytes))),
                Message::Close(frame) => {
                    tracing::debug!(frame = ?frame, "Server sent close frame");
                    self.closed = true;
                    return None;
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
    }

    async fn send_text(&mut self, text: String) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Channel("channel closed".to_string()));
        }
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(channel_error)
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "Close handshake failed");
        }
    }
}

fn channel_error(error: tungstenite::Error) -> TransportError {
    match error {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            TransportError::Channel("connection closed".to_string())
        }
        other => TransportError::Channel(other.to_string()),
    }
}
