//! Shared payload builders for integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};

/// A schema-valid `data` payload for the given episode and phase.
pub fn tick_data(episode: u64, phase: &str) -> Value {
    json!({
        "simulationTime": episode as f64 * 60.0,
        "cycleNumber": episode * 3,
        "intersection": {
            "northQueue": 4,
            "southQueue": 2,
            "eastQueue": 11,
            "westQueue": 0,
            "currentPhase": phase,
            "phaseTimeRemaining": 12.5,
            "vehicles": [
                {"id": "veh_1", "lane": "north", "position": 20.0, "speed": 8.5},
                {"id": "veh_2", "lane": "east", "position": 3.0, "speed": 0.0}
            ]
        },
        "performance": {
            "avgWaitTime": 18.2,
            "throughput": 1520,
            "maxQueue": 11,
            "efficiencyScore": 86.5
        },
        "agent": {
            "lastAction": "EXTEND_NS",
            "epsilon": 0.12,
            "episode": episode,
            "replayBufferFull": 64.0,
            "recentActions": [
                {"time": "14:32:41", "action": "EXTEND_NS"},
                {"time": "14:32:30", "action": "SWITCH_EW"}
            ]
        }
    })
}

pub fn initial_data(episode: u64, is_running: bool) -> String {
    json!({
        "type": "initial_data",
        "data": tick_data(episode, "NS_GREEN"),
        "isRunning": is_running,
    })
    .to_string()
}

pub fn simulation_update(episode: u64, phase: &str) -> String {
    json!({
        "type": "simulation_update",
        "data": tick_data(episode, phase),
    })
    .to_string()
}

pub fn simulation_stopped() -> String {
    json!({"type": "simulation_stopped", "isRunning": false}).to_string()
}
