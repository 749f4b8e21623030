//! Performance metrics computed by the simulation for the running episode.

use serde::{Deserialize, Serialize};

/// Aggregate traffic performance. All values are finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSnapshot {
    /// Mean wait per vehicle, seconds.
    pub avg_wait_time: f64,
    /// Vehicles per hour.
    pub throughput: f64,
    pub max_queue: f64,
    /// 0-100 score.
    pub efficiency_score: f64,
}
