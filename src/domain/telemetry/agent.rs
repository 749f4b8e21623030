//! Reinforcement-learning agent status as reported alongside each tick.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;

/// One recent control decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Wall-clock label supplied by the backend (e.g. `14:32:41`).
    pub time: String,
    pub action: String,
}

/// Learning state of the signal-control agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    /// Action tag such as `EXTEND_NS` or `SWITCH_EW`; empty before the first decision.
    pub last_action: String,
    /// Exploration rate in `[0, 1]`.
    pub epsilon: f64,
    pub episode: u64,
    pub replay_buffer_full: Percentage,
    /// Most recent first, in the order the backend sent them.
    pub recent_actions: Vec<ActionRecord>,
}

impl AgentSnapshot {
    /// True once the agent has made at least one decision.
    pub fn has_acted(&self) -> bool {
        !self.last_action.is_empty()
    }
}
