//! Telemetry client - the single consumer of the stream.
//!
//! One actor task owns the [`StoreWriter`]. Commands from the handle and
//! reports from the per-attempt reader task arrive on two bounded queues and
//! are handled one at a time, so no two envelopes are ever validated or
//! applied concurrently.
//!
//! ```text
//! TelemetryClient ──commands──► actor ◄──reports── attempt reader ◄── FrameChannel
//!                                 │
//!                                 ▼
//!                            StoreWriter ──► TelemetryReader(s)
//! ```
//!
//! Every report carries the [`AttemptId`] it came from. Reports from an
//! attempt that is no longer current, or that arrive while the link is not
//! `Connected`, are dropped before they reach the store.
//!
//! There is no automatic reconnection. After a close, the caller decides
//! whether to call [`TelemetryClient::connect`] again.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval};

use crate::config::ClientConfig;
use crate::domain::stream::{
    read_binary_frame, read_frame, AttemptId, ClientMessage, InboundMessage, StreamError,
    StreamEvent, TelemetrySnapshot,
};
use crate::ports::{
    Endpoint, FrameChannel, InboundFrame, TelemetryTransport, TelemetryValidator, TransportError,
};

use super::store::{StoreWriter, TelemetryReader, TelemetryStore};

/// How long shutdown waits for a reader to send its close frame.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Errors returned by [`TelemetryClient`] handle methods.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Telemetry client has stopped")]
    Stopped,

    #[error("Telemetry client task failed: {0}")]
    TaskFailed(String),
}

#[derive(Debug)]
enum Command {
    Connect,
    Disconnect,
    Shutdown,
}

/// What a reader task saw on its channel.
#[derive(Debug)]
enum ReaderEvent {
    Opened,
    Frame(InboundFrame),
    Closed(Option<TransportError>),
}

#[derive(Debug)]
struct Report {
    attempt: AttemptId,
    event: ReaderEvent,
}

/// Handle to a running telemetry client.
pub struct TelemetryClient {
    commands: mpsc::Sender<Command>,
    reader: TelemetryReader,
    task: JoinHandle<()>,
}

impl TelemetryClient {
    /// Starts the client actor. No connection is opened until [`connect`](Self::connect).
    pub fn spawn(
        transport: Arc<dyn TelemetryTransport>,
        validator: Arc<dyn TelemetryValidator>,
        config: ClientConfig,
        endpoint: Endpoint,
    ) -> Self {
        let (writer, reader) = TelemetryStore::new();
        let (command_tx, command_rx) = mpsc::channel(config.command_capacity.max(1));
        let (report_tx, report_rx) = mpsc::channel(config.inbound_capacity.max(1));

        let actor = ClientActor {
            transport,
            validator,
            config,
            endpoint,
            writer,
            commands: command_rx,
            report_tx,
            reports: report_rx,
            current: None,
            last_attempt: AttemptId::default(),
        };
        let task = tokio::spawn(actor.run());

        Self {
            commands: command_tx,
            reader,
            task,
        }
    }

    /// Starts a new connection attempt, closing the current one cleanly first.
    pub async fn connect(&self) -> Result<(), ClientError> {
        self.send(Command::Connect).await
    }

    /// Closes the current connection, if any. Not treated as an error.
    pub async fn disconnect(&self) -> Result<(), ClientError> {
        self.send(Command::Disconnect).await
    }

    /// A new reader over the client's store.
    pub fn reader(&self) -> TelemetryReader {
        self.reader.clone()
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> Arc<TelemetrySnapshot> {
        self.reader.current()
    }

    /// Closes any open connection, stops the actor and waits for it.
    pub async fn shutdown(self) -> Result<(), ClientError> {
        // The actor may already be gone; joining below reports how it ended.
        let _ = self.commands.send(Command::Shutdown).await;
        self.task
            .await
            .map_err(|e| ClientError::TaskFailed(e.to_string()))
    }

    async fn send(&self, command: Command) -> Result<(), ClientError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::Stopped)
    }
}

struct AttemptHandle {
    id: AttemptId,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

struct ClientActor {
    transport: Arc<dyn TelemetryTransport>,
    validator: Arc<dyn TelemetryValidator>,
    config: ClientConfig,
    endpoint: Endpoint,
    writer: StoreWriter,
    commands: mpsc::Receiver<Command>,
    report_tx: mpsc::Sender<Report>,
    reports: mpsc::Receiver<Report>,
    current: Option<AttemptHandle>,
    last_attempt: AttemptId,
}

impl ClientActor {
    async fn run(mut self) {
        tracing::debug!(endpoint = %self.endpoint, "Telemetry client started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(Command::Connect) => self.connect(),
                    Some(Command::Disconnect) => self.disconnect(),
                    Some(Command::Shutdown) | None => break,
                },
                // The actor holds a sender, so this queue never closes.
                Some(report) = self.reports.recv() => self.handle_report(report),
            }
        }

        if let Some(AttemptHandle { id, mut task, .. }) = self.stop_current() {
            if time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
                tracing::warn!(attempt = %id, "Reader did not close in time");
                task.abort();
            }
        }
        tracing::debug!("Telemetry client stopped");
    }

    fn connect(&mut self) {
        // Close any live attempt so the new one starts from Disconnected.
        self.stop_current();

        let attempt = self.last_attempt.next();
        self.last_attempt = attempt;
        self.commit(StreamEvent::ConnectStarted { attempt });

        let (stop_tx, stop_rx) = watch::channel(false);
        let reader = AttemptReader {
            attempt,
            transport: Arc::clone(&self.transport),
            endpoint: self.endpoint.clone(),
            connect_timeout: self.config.connect_timeout(),
            keepalive: self.config.keepalive(),
            reports: self.report_tx.clone(),
            stop: stop_rx,
        };

        tracing::info!(attempt = %attempt, endpoint = %self.endpoint, "Connecting to telemetry stream");
        self.current = Some(AttemptHandle {
            id: attempt,
            stop: stop_tx,
            task: tokio::spawn(reader.run()),
        });
    }

    fn disconnect(&mut self) {
        if self.stop_current().is_none() {
            tracing::debug!("Disconnect requested with no open connection");
        }
    }

    /// Signals the current reader to close and marks its attempt closed.
    fn stop_current(&mut self) -> Option<AttemptHandle> {
        let handle = self.current.take()?;
        if self
            .commit(StreamEvent::Closed {
                attempt: handle.id,
                error: None,
            })
            .is_some()
        {
            tracing::info!(attempt = %handle.id, "Telemetry stream closed by client");
        }
        // A reader that already exited has dropped its receiver.
        let _ = handle.stop.send(true);
        Some(handle)
    }

    fn handle_report(&mut self, report: Report) {
        let Report { attempt, event } = report;

        match event {
            ReaderEvent::Opened => {
                if self.commit(StreamEvent::HandshakeCompleted { attempt }).is_some() {
                    tracing::info!(attempt = %attempt, "Telemetry stream connected");
                }
            }
            ReaderEvent::Frame(frame) => {
                if !self.writer.current().accepts_frames_from(attempt) {
                    tracing::debug!(attempt = %attempt, "Discarding frame from closed connection");
                    return;
                }
                let outcome = match &frame {
                    InboundFrame::Text(text) => read_frame(text, self.validator.as_ref()),
                    InboundFrame::Binary(bytes) => read_binary_frame(bytes, self.validator.as_ref()),
                };
                log_outcome(attempt, &outcome);
                self.commit(StreamEvent::Inbound { attempt, outcome });
            }
            ReaderEvent::Closed(error) => {
                let error = error.map(StreamError::from);
                match &error {
                    Some(e) => tracing::warn!(attempt = %attempt, error = %e, "Telemetry stream failed"),
                    None => tracing::info!(attempt = %attempt, "Telemetry stream closed by server"),
                }
                if self.commit(StreamEvent::Closed { attempt, error }).is_some() {
                    if self.current.as_ref().map(|h| h.id) == Some(attempt) {
                        self.current = None;
                    }
                } else {
                    tracing::debug!(attempt = %attempt, "Ignoring close of superseded connection");
                }
            }
        }
    }

    fn commit(&self, event: StreamEvent) -> Option<Arc<TelemetrySnapshot>> {
        let attempt = event.attempt();
        let snapshot = self.writer.apply(event)?;
        tracing::trace!(
            attempt = %attempt,
            version = snapshot.version,
            link = %snapshot.connection.link,
            "Snapshot published"
        );
        Some(snapshot)
    }
}

fn log_outcome(attempt: AttemptId, outcome: &Result<InboundMessage, StreamError>) {
    match outcome {
        Ok(InboundMessage::Telemetry { kind, tick, .. }) => tracing::debug!(
            attempt = %attempt,
            kind = ?kind,
            episode = tick.episode(),
            phase = tick.phase().as_tag(),
            "Telemetry received"
        ),
        Ok(InboundMessage::Stopped) => tracing::info!(attempt = %attempt, "Simulation stopped"),
        Ok(InboundMessage::Pong) => tracing::trace!(attempt = %attempt, "Keepalive answered"),
        Ok(InboundMessage::Ignored(kind)) => {
            tracing::debug!(attempt = %attempt, kind = %kind, "Ignoring envelope")
        }
        Err(e) => tracing::warn!(
            attempt = %attempt,
            kind = e.kind(),
            error = %e,
            "Rejected inbound frame"
        ),
    }
}

/// Owns the channel for one connection attempt.
struct AttemptReader {
    attempt: AttemptId,
    transport: Arc<dyn TelemetryTransport>,
    endpoint: Endpoint,
    connect_timeout: Duration,
    keepalive: Option<Duration>,
    reports: mpsc::Sender<Report>,
    stop: watch::Receiver<bool>,
}

impl AttemptReader {
    async fn run(mut self) {
        let opened = tokio::select! {
            result = time::timeout(self.connect_timeout, self.transport.open(&self.endpoint)) => result,
            _ = self.stop.changed() => return,
        };

        let mut channel = match opened {
            Ok(Ok(channel)) => channel,
            Ok(Err(e)) => {
                self.report(ReaderEvent::Closed(Some(e))).await;
                return;
            }
            Err(_) => {
                let secs = self.connect_timeout.as_secs();
                self.report(ReaderEvent::Closed(Some(TransportError::Timeout(secs))))
                    .await;
                return;
            }
        };

        if !self.report(ReaderEvent::Opened).await {
            channel.close().await;
            return;
        }

        let end = self.pump(channel.as_mut()).await;
        match end {
            PumpEnd::Stopped => channel.close().await,
            PumpEnd::Closed(error) => {
                self.report(ReaderEvent::Closed(error)).await;
            }
        }
    }

    async fn pump(&mut self, channel: &mut dyn FrameChannel) -> PumpEnd {
        let mut keepalive = self
            .keepalive
            .map(|period| time::interval_at(Instant::now() + period, period));

        loop {
            tokio::select! {
                _ = self.stop.changed() => return PumpEnd::Stopped,
                frame = channel.next_frame() => match frame {
                    Some(Ok(frame)) => {
                        if !self.report(ReaderEvent::Frame(frame)).await {
                            return PumpEnd::Stopped;
                        }
                    }
                    Some(Err(e)) => return PumpEnd::Closed(Some(e)),
                    None => return PumpEnd::Closed(None),
                },
                _ = next_tick(keepalive.as_mut()) => {
                    if let Err(e) = channel.send_text(ClientMessage::Ping.to_text()).await {
                        return PumpEnd::Closed(Some(e));
                    }
                }
            }
        }
    }

    /// Forwards one event to the actor, giving up if asked to stop.
    ///
    /// Returns false when the actor no longer wants events from this attempt.
    async fn report(&mut self, event: ReaderEvent) -> bool {
        let report = Report {
            attempt: self.attempt,
            event,
        };
        tokio::select! {
            sent = self.reports.send(report) => sent.is_ok(),
            _ = self.stop.changed() => false,
        }
    }
}

enum PumpEnd {
    Stopped,
    Closed(Option<TransportError>),
}

async fn next_tick(interval: Option<&mut Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}
