//! Integration tests for the telemetry client over the in-memory transport.
//!
//! Each test scripts the server side of one or more connections and asserts
//! on the snapshots published to a reader.

mod common;

use std::sync::Arc;
use std::time::Duration;

use traffic_telemetry::adapters::{InMemoryTransport, TelemetrySchemaValidator};
use traffic_telemetry::application::{TelemetryClient, TelemetryReader};
use traffic_telemetry::config::ClientConfig;
use traffic_telemetry::domain::stream::{LinkState, TelemetrySnapshot};
use traffic_telemetry::domain::telemetry::{Direction, SignalPhase};
use traffic_telemetry::domain::views::{signal_status, SignalStatus, StatusBadge};
use traffic_telemetry::ports::{Endpoint, TransportError};

use common::{initial_data, simulation_stopped, simulation_update};

// =============================================================================
// Test Infrastructure
// =============================================================================

const WAIT: Duration = Duration::from_secs(5);

fn spawn_client(transport: &Arc<InMemoryTransport>) -> TelemetryClient {
    spawn_with(transport, ClientConfig {
        keepalive_secs: 0,
        ..Default::default()
    })
}

fn spawn_with(transport: &Arc<InMemoryTransport>, config: ClientConfig) -> TelemetryClient {
    let transport: Arc<InMemoryTransport> = Arc::clone(transport);
    TelemetryClient::spawn(
        transport,
        Arc::new(TelemetrySchemaValidator::new()),
        config,
        Endpoint::new("ws://localhost:8000/ws"),
    )
}

async fn wait_until<F>(reader: &mut TelemetryReader, predicate: F) -> Arc<TelemetrySnapshot>
where
    F: FnMut(&TelemetrySnapshot) -> bool,
{
    tokio::time::timeout(WAIT, reader.wait_for(predicate))
        .await
        .expect("timed out waiting for snapshot")
        .expect("store closed")
}

fn episode(snapshot: &TelemetrySnapshot) -> Option<u64> {
    snapshot.tick().map(|t| t.episode())
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn scenario_sequence_initial_update_malformed_stopped() {
    let transport = Arc::new(InMemoryTransport::new());
    let peer = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    wait_until(&mut reader, |s| s.connection.is_connected).await;

    // A: initial data
    peer.send_text(initial_data(1, true));
    let a = wait_until(&mut reader, |s| episode(s) == Some(1)).await;
    assert!(a.connection.is_connected);
    assert!(a.connection.is_running);
    assert_eq!(StatusBadge::from_connection(&a.connection), StatusBadge::Live);

    // B: update flips nothing but the tick
    peer.send_text(simulation_update(2, "NS_GREEN"));
    let b = wait_until(&mut reader, |s| episode(s) == Some(2)).await;
    let phase = b.tick().map(|t| t.phase());
    assert_eq!(phase, Some(SignalPhase::NsGreen));
    assert_eq!(signal_status(phase, Direction::North), SignalStatus::GREEN);
    assert_eq!(signal_status(phase, Direction::South), SignalStatus::GREEN);
    assert_eq!(signal_status(phase, Direction::East), SignalStatus::RED);
    assert_eq!(signal_status(phase, Direction::West), SignalStatus::RED);
    assert!(b.connection.is_running, "absent isRunning keeps the flag");

    // C: malformed envelope
    peer.send_text("{\"type\": \"simulation_update\", \"data\": ");
    let c = wait_until(&mut reader, |s| s.connection.last_error.is_some()).await;
    assert_eq!(episode(&c), Some(2));
    assert!(c.connection.is_running);
    assert!(Arc::ptr_eq(
        b.telemetry.as_ref().unwrap(),
        c.telemetry.as_ref().unwrap()
    ));

    // D: stopped
    peer.send_text(simulation_stopped());
    let d = wait_until(&mut reader, |s| !s.connection.is_running).await;
    assert_eq!(episode(&d), Some(2));
    assert_eq!(d.connection.last_error, None);
    assert!(d.connection.is_connected);
    assert_eq!(StatusBadge::from_connection(&d.connection), StatusBadge::Idle);

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn schema_violation_keeps_previous_tick() {
    let transport = Arc::new(InMemoryTransport::new());
    let peer = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    peer.send_text(initial_data(5, true));
    let before = wait_until(&mut reader, |s| episode(s) == Some(5)).await;

    peer.send_text(simulation_update(6, "ALL_GREEN"));
    let after = wait_until(&mut reader, |s| s.connection.last_error.is_some()).await;

    assert_eq!(before.tick(), after.tick());
    let error = after.connection.last_error.as_ref().unwrap();
    assert_eq!(error.kind(), "validation");
    assert!(error.to_string().contains("intersection.currentPhase"), "{error}");

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn undecodable_binary_frame_is_recorded_and_stream_continues() {
    let transport = Arc::new(InMemoryTransport::new());
    let peer = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    peer.send_text(initial_data(2, true));
    wait_until(&mut reader, |s| episode(s) == Some(2)).await;

    peer.send_binary(vec![0xc3, 0x28]);
    let failed = wait_until(&mut reader, |s| s.connection.last_error.is_some()).await;
    assert_eq!(
        failed.connection.last_error.as_ref().map(|e| e.kind()),
        Some("envelope_parse")
    );
    assert_eq!(episode(&failed), Some(2));

    peer.send_binary(simulation_update(3, "NS_GREEN").into_bytes());
    let recovered = wait_until(&mut reader, |s| episode(s) == Some(3)).await;
    assert_eq!(recovered.connection.last_error, None);

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn transport_error_resets_flags_and_keeps_stale_tick() {
    let transport = Arc::new(InMemoryTransport::new());
    let peer = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    peer.send_text(initial_data(3, true));
    wait_until(&mut reader, |s| episode(s) == Some(3)).await;

    peer.fail(TransportError::Channel("connection reset by peer".to_string()));
    let closed = wait_until(&mut reader, |s| s.connection.link == LinkState::Disconnected).await;

    assert!(!closed.connection.is_connected);
    assert!(!closed.connection.is_running);
    assert_eq!(closed.connection.last_error.as_ref().map(|e| e.kind()), Some("transport"));
    assert_eq!(episode(&closed), Some(3));
    assert!(closed.live_tick().is_none());

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn server_close_is_clean_and_not_retried() {
    let transport = Arc::new(InMemoryTransport::new());
    let peer = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    wait_until(&mut reader, |s| s.connection.is_connected).await;
    peer.close();

    let closed = wait_until(&mut reader, |s| s.connection.link == LinkState::Disconnected).await;
    assert_eq!(closed.connection.last_error, None);

    // No reconnection without an explicit connect.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.opened().len(), 1);
    assert_eq!(reader.current().version, closed.version);

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn reconnect_does_not_treat_old_tick_as_live() {
    let transport = Arc::new(InMemoryTransport::new());
    let first = transport.connect_next();
    let second = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    first.send_text(initial_data(7, true));
    wait_until(&mut reader, |s| episode(s) == Some(7)).await;

    client.connect().await.unwrap();
    let reconnected = wait_until(&mut reader, |s| {
        s.connection.attempt.value() == 2 && s.connection.is_connected
    })
    .await;
    assert!(!reconnected.connection.is_running);
    assert!(reconnected.live_tick().is_none());
    assert_eq!(episode(&reconnected), Some(7));

    // Frames still queued on the first connection never reach the store.
    first.send_text(simulation_update(99, "EW_GREEN"));
    second.send_text(initial_data(8, true));
    let live = wait_until(&mut reader, |s| s.live_tick().is_some()).await;
    assert_eq!(episode(&live), Some(8));

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn connect_timeout_is_reported_as_transport_error() {
    let transport = Arc::new(InMemoryTransport::new());
    transport.push_hang();
    let client = spawn_with(&transport, ClientConfig {
        keepalive_secs: 0,
        connect_timeout_secs: 1,
        ..Default::default()
    });
    let mut reader = client.reader();

    client.connect().await.unwrap();
    let closed = wait_until(&mut reader, |s| {
        s.connection.attempt.value() == 1 && s.connection.link == LinkState::Disconnected
    })
    .await;
    let error = closed.connection.last_error.as_ref().expect("timeout recorded");
    assert!(error.to_string().contains("timed out"), "{error}");

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn keepalive_ping_is_sent_and_pong_changes_nothing() {
    let transport = Arc::new(InMemoryTransport::new());
    let mut peer = transport.connect_next();
    let client = spawn_with(&transport, ClientConfig {
        keepalive_secs: 1,
        ..Default::default()
    });
    let mut reader = client.reader();

    client.connect().await.unwrap();
    let connected = wait_until(&mut reader, |s| s.connection.is_connected).await;

    let ping = tokio::time::timeout(WAIT, peer.next_sent())
        .await
        .expect("ping within keepalive interval");
    assert_eq!(ping.as_deref(), Some("{\"type\":\"ping\"}"));

    peer.send_text("{\"type\":\"pong\"}");
    peer.send_text(initial_data(1, false));
    let next = wait_until(&mut reader, |s| episode(s) == Some(1)).await;
    // Only the telemetry frame produced a new version.
    assert_eq!(next.version, connected.version + 1);

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn disconnect_sends_close_to_peer() {
    let transport = Arc::new(InMemoryTransport::new());
    let mut peer = transport.connect_next();
    let client = spawn_client(&transport);
    let mut reader = client.reader();

    client.connect().await.unwrap();
    wait_until(&mut reader, |s| s.connection.is_connected).await;

    client.disconnect().await.unwrap();
    tokio::time::timeout(WAIT, peer.closed_by_client())
        .await
        .expect("client closed the channel");

    let snapshot = reader.current();
    assert_eq!(snapshot.connection.link, LinkState::Disconnected);
    assert_eq!(snapshot.connection.last_error, None);

    client.shutdown().await.unwrap();
}
