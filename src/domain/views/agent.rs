//! Agent and performance panels.

use serde::Serialize;

use crate::domain::telemetry::{ActionRecord, AgentSnapshot, PerformanceSnapshot};

/// Efficiency scores strictly above this are on target.
pub const EFFICIENCY_TARGET: f64 = 85.0;

/// Coarse category of an agent action tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Extend,
    Switch,
    Other,
}

impl ActionKind {
    pub fn classify(action: &str) -> Self {
        if action.starts_with("EXTEND_") {
            ActionKind::Extend
        } else if action.starts_with("SWITCH_") {
            ActionKind::Switch
        } else {
            ActionKind::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionView {
    pub time: String,
    pub action: String,
    pub kind: ActionKind,
}

impl From<&ActionRecord> for ActionView {
    fn from(record: &ActionRecord) -> Self {
        Self {
            time: record.time.clone(),
            action: record.action.clone(),
            kind: ActionKind::classify(&record.action),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentView {
    /// `None` before the agent's first decision.
    pub last_action: Option<String>,
    pub last_action_kind: ActionKind,
    pub epsilon: f64,
    pub episode: u64,
    /// Replay buffer fill as a fraction in `[0, 1]`.
    pub replay_buffer_fill: f64,
    pub recent_actions: Vec<ActionView>,
}

impl AgentView {
    pub fn from_snapshot(agent: &AgentSnapshot) -> Self {
        Self {
            last_action: agent.has_acted().then(|| agent.last_action.clone()),
            last_action_kind: ActionKind::classify(&agent.last_action),
            epsilon: agent.epsilon,
            episode: agent.episode,
            replay_buffer_fill: agent.replay_buffer_full.as_fraction(),
            recent_actions: agent.recent_actions.iter().map(ActionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceView {
    pub avg_wait_time: f64,
    pub throughput: f64,
    pub max_queue: f64,
    pub efficiency_score: f64,
    pub on_target: bool,
}

impl PerformanceView {
    pub fn from_snapshot(performance: &PerformanceSnapshot) -> Self {
        Self {
            avg_wait_time: performance.avg_wait_time,
            throughput: performance.throughput,
            max_queue: performance.max_queue,
            efficiency_score: performance.efficiency_score,
            on_target: performance.efficiency_score > EFFICIENCY_TARGET,
        }
    }
}
