//! Validation adapters.
//!
//! - `TelemetrySchemaValidator` - hand-written schema check for envelope payloads

mod telemetry_schema_validator;

pub use telemetry_schema_validator::TelemetrySchemaValidator;
