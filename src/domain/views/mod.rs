//! Derived views - pure mappings from stored state to rendering-ready values.
//!
//! Nothing here performs I/O or holds state. Consumers read a
//! [`TelemetrySnapshot`](crate::domain::stream::TelemetrySnapshot) and pass its
//! parts through these functions.

mod agent;
mod intersection;
mod signal;
mod status;

pub use agent::{ActionKind, ActionView, AgentView, PerformanceView, EFFICIENCY_TARGET};
pub use intersection::{IntersectionView, LaneView, MAX_VISIBLE_VEHICLES};
pub use signal::{phase_label, signal_status, signal_status_for_tag, SignalStatus};
pub use status::{banner, StatusBadge};
