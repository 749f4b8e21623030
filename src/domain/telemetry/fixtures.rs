//! Tick builders shared by unit tests.

use crate::domain::foundation::Percentage;

use super::{
    ActionRecord, AgentSnapshot, Intersection, PerformanceSnapshot, QueueCounts, SignalPhase,
    SimulationTick, TelemetryTick, Vehicle,
};

/// A tick in `phase` with the agent at `episode` and empty queues.
pub(crate) fn tick(episode: u64, phase: SignalPhase) -> TelemetryTick {
    TelemetryTick {
        simulation: SimulationTick {
            simulation_time: episode as f64 * 10.0,
            cycle_number: episode,
            intersection: Intersection {
                queues: QueueCounts::default(),
                current_phase: phase,
                phase_time_remaining: 5.0,
                vehicles: vec![],
            },
        },
        performance: PerformanceSnapshot::default(),
        agent: AgentSnapshot {
            last_action: "EXTEND_NS".to_string(),
            epsilon: 0.1,
            episode,
            replay_buffer_full: Percentage::new(50.0),
            recent_actions: vec![],
        },
    }
}

/// A tick with the given queues, one vehicle per queued north car, and a
/// short action history.
pub(crate) fn busy_tick(queues: QueueCounts) -> TelemetryTick {
    let mut tick = tick(3, SignalPhase::EwGreen);
    tick.simulation.intersection.queues = queues;
    tick.simulation.intersection.vehicles = (0..queues.north)
        .map(|i| Vehicle {
            id: format!("v{i}"),
            lane: super::Direction::North,
            position: f64::from(i) * 6.0,
            speed: 0.0,
        })
        .collect();
    tick.performance = PerformanceSnapshot {
        avg_wait_time: 12.5,
        throughput: 840.0,
        max_queue: f64::from(queues.north.max(queues.south).max(queues.east).max(queues.west)),
        efficiency_score: 87.0,
    };
    tick.agent.recent_actions = vec![
        ActionRecord {
            time: "14:32:41".to_string(),
            action: "SWITCH_EW".to_string(),
        },
        ActionRecord {
            time: "14:32:30".to_string(),
            action: "EXTEND_NS".to_string(),
        },
        ActionRecord {
            time: "14:32:19".to_string(),
            action: "HOLD".to_string(),
        },
    ];
    tick
}
