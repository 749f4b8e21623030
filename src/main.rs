//! Streams telemetry from the simulation backend and logs each update.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use traffic_telemetry::adapters::{TelemetrySchemaValidator, WebSocketTransport};
use traffic_telemetry::application::{TelemetryClient, TelemetryReader};
use traffic_telemetry::config::{AppConfig, LoggingConfig};
use traffic_telemetry::domain::foundation::Timestamp;
use traffic_telemetry::domain::views::{banner, IntersectionView, StatusBadge};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load_validated()?;
    init_tracing(&config.logging);

    let endpoint = config.stream.endpoint();
    tracing::info!(endpoint = %endpoint, "Starting telemetry client");

    let client = TelemetryClient::spawn(
        Arc::new(WebSocketTransport::new()),
        Arc::new(TelemetrySchemaValidator::new()),
        config.client.clone(),
        endpoint,
    );
    client.connect().await?;

    tokio::select! {
        _ = log_snapshots(client.reader()) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            }
            tracing::info!("Shutting down");
        }
    }

    client.shutdown().await?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }
}

async fn log_snapshots(mut reader: TelemetryReader) {
    while let Some(snapshot) = reader.changed().await {
        let badge = StatusBadge::from_connection(&snapshot.connection);
        let error = banner(&snapshot.connection);

        let live = snapshot.live_tick().zip(snapshot.telemetry.as_deref());
        match live {
            Some((tick, record)) => tracing::info!(
                version = snapshot.version,
                status = %badge,
                episode = tick.episode(),
                age_ms = record.age(Timestamp::now()).num_milliseconds(),
                epsilon = tick.agent.epsilon,
                efficiency = tick.performance.efficiency_score,
                intersection = %IntersectionView::from_tick(tick).summary(),
                error = error.as_deref(),
                "Telemetry"
            ),
            None => tracing::info!(
                version = snapshot.version,
                status = %badge,
                error = error.as_deref(),
                "Connection"
            ),
        }
    }
}
