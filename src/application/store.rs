//! Telemetry store - single writer, many readers.
//!
//! The current [`TelemetrySnapshot`] lives behind a `watch` channel. The
//! writer swaps in a whole new `Arc` per transition, so a reader always sees
//! one complete snapshot and never a mix of two envelopes.
//!
//! ```text
//! client actor ──► StoreWriter ──watch──► TelemetryReader (clone per consumer)
//! ```

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::foundation::Timestamp;
use crate::domain::stream::{StreamEvent, TelemetrySnapshot};

/// Creates an empty store and returns its two halves.
pub struct TelemetryStore;

impl TelemetryStore {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (StoreWriter, TelemetryReader) {
        let (tx, rx) = watch::channel(Arc::new(TelemetrySnapshot::default()));
        (StoreWriter { tx }, TelemetryReader { rx })
    }
}

/// The only handle that can change stored state. Not `Clone`.
#[derive(Debug)]
pub struct StoreWriter {
    tx: watch::Sender<Arc<TelemetrySnapshot>>,
}

impl StoreWriter {
    /// Applies `event` to the current snapshot and publishes the result.
    ///
    /// Returns the new snapshot, or `None` if the event was discarded.
    pub fn apply(&self, event: StreamEvent) -> Option<Arc<TelemetrySnapshot>> {
        let next = Arc::new(self.tx.borrow().apply(event, Timestamp::now())?);
        // send_replace publishes even when every reader has gone away.
        self.tx.send_replace(Arc::clone(&next));
        Some(next)
    }

    pub fn current(&self) -> Arc<TelemetrySnapshot> {
        Arc::clone(&self.tx.borrow())
    }
}

/// Read-only view of the store.
#[derive(Debug, Clone)]
pub struct TelemetryReader {
    rx: watch::Receiver<Arc<TelemetrySnapshot>>,
}

impl TelemetryReader {
    /// The latest published snapshot.
    pub fn current(&self) -> Arc<TelemetrySnapshot> {
        Arc::clone(&self.rx.borrow())
    }

    /// Waits for a snapshot newer than the last one this reader saw.
    ///
    /// Returns `None` once the writer is gone.
    pub async fn changed(&mut self) -> Option<Arc<TelemetrySnapshot>> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }

    /// Waits until a snapshot satisfies `predicate`, checking the current one first.
    pub async fn wait_for<F>(&mut self, mut predicate: F) -> Option<Arc<TelemetrySnapshot>>
    where
        F: FnMut(&TelemetrySnapshot) -> bool,
    {
        let snapshot = self.rx.wait_for(|s| predicate(s)).await.ok()?;
        Some(Arc::clone(&snapshot))
    }
}
