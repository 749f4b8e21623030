//! Domain layer - telemetry types, stream state transitions and derived views.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, percentages, state machine trait, errors)
//! - `telemetry` - The typed tick composite: simulation, performance and agent state
//! - `stream` - Envelope decoding, connection state and the snapshot reducer
//! - `views` - Pure functions mapping snapshots to rendering-ready structures

pub mod foundation;
pub mod stream;
pub mod telemetry;
pub mod views;
