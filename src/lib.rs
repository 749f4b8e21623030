//! Traffic Telemetry - real-time client for the adaptive traffic-signal stream
//!
//! This crate consumes the simulation backend's WebSocket stream, validates
//! every telemetry update against a strict schema, and publishes one
//! consistent snapshot of connection status and last-known-good telemetry
//! to any number of readers. Derived views turn a snapshot into
//! rendering-ready structures.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
