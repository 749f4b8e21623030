//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, the state machine trait, and error types
//! shared by the telemetry and stream domains.

mod errors;
mod percentage;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
