//! Application layer - the telemetry store and the client actor that feeds it.

mod client;
mod store;

pub use client::{ClientError, TelemetryClient};
pub use store::{StoreWriter, TelemetryReader, TelemetryStore};
