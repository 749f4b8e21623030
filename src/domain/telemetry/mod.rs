//! Telemetry domain - the typed composite carried by every stream update.
//!
//! A [`TelemetryTick`] bundles the simulation state, the performance metrics
//! and the agent status of one instant. It is always replaced as a whole;
//! no field of a stored tick is ever patched individually.

mod agent;
mod direction;
mod performance;
mod phase;
mod tick;

#[cfg(test)]
pub(crate) mod fixtures;

pub use agent::{ActionRecord, AgentSnapshot};
pub use direction::{Axis, Direction};
pub use performance::PerformanceSnapshot;
pub use phase::SignalPhase;
pub use tick::{Intersection, QueueCounts, SimulationTick, Vehicle};

use serde::{Deserialize, Serialize};

/// One validated telemetry update.
///
/// Serializes to the same camelCase shape the backend sends in the `data`
/// field of an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryTick {
    #[serde(flatten)]
    pub simulation: SimulationTick,
    pub performance: PerformanceSnapshot,
    pub agent: AgentSnapshot,
}

impl TelemetryTick {
    /// Current signal phase.
    pub fn phase(&self) -> SignalPhase {
        self.simulation.intersection.current_phase
    }

    /// Training episode the agent is in.
    pub fn episode(&self) -> u64 {
        self.agent.episode
    }
}
