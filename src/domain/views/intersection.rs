//! Rendering-ready intersection layout.

use serde::Serialize;

use crate::domain::telemetry::{Direction, TelemetryTick};

use super::signal::{phase_label, signal_status, SignalStatus};

/// At most this many queued vehicles are drawn per approach.
pub const MAX_VISIBLE_VEHICLES: u32 = 8;

/// One approach of the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LaneView {
    pub direction: Direction,
    pub signal: SignalStatus,
    pub queue: u32,
    pub visible_vehicles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionView {
    pub lanes: [LaneView; 4],
    pub phase_label: &'static str,
    pub phase_time_remaining: f64,
    pub simulation_time: f64,
    pub cycle_number: u64,
}

impl IntersectionView {
    pub fn from_tick(tick: &TelemetryTick) -> Self {
        let intersection = &tick.simulation.intersection;
        let phase = Some(intersection.current_phase);

        let lanes = Direction::ALL.map(|direction| {
            let queue = intersection.queues.for_direction(direction);
            LaneView {
                direction,
                signal: signal_status(phase, direction),
                queue,
                visible_vehicles: queue.min(MAX_VISIBLE_VEHICLES),
            }
        });

        Self {
            lanes,
            phase_label: phase_label(phase),
            phase_time_remaining: intersection.phase_time_remaining,
            simulation_time: tick.simulation.simulation_time,
            cycle_number: tick.simulation.cycle_number,
        }
    }

    pub fn lane(&self, direction: Direction) -> &LaneView {
        // Lanes are built in Direction::ALL order.
        &self.lanes[direction as usize]
    }

    /// One-line summary for logs, e.g. `East-West Green 4.0s N3 S0 E1 W2`.
    pub fn summary(&self) -> String {
        let queues: Vec<String> = self
            .lanes
            .iter()
            .map(|lane| format!("{}{}", lane.direction.initial(), lane.queue))
            .collect();
        format!(
            "{} {:.1}s {}",
            self.phase_label,
            self.phase_time_remaining,
            queues.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::fixtures::busy_tick;
    use crate::domain::telemetry::QueueCounts;

    fn view() -> IntersectionView {
        IntersectionView::from_tick(&busy_tick(QueueCounts {
            north: 3,
            south: 0,
            east: 12,
            west: 8,
        }))
    }

    #[test]
    fn visible_vehicles_are_capped_at_eight() {
        let view = view();
        assert_eq!(view.lane(Direction::North).visible_vehicles, 3);
        assert_eq!(view.lane(Direction::South).visible_vehicles, 0);
        assert_eq!(view.lane(Direction::East).visible_vehicles, 8);
        assert_eq!(view.lane(Direction::East).queue, 12);
        assert_eq!(view.lane(Direction::West).visible_vehicles, 8);
    }

    #[test]
    fn lanes_follow_the_phase() {
        let view = view();
        assert_eq!(view.phase_label, "East-West Green");
        assert!(view.lane(Direction::East).signal.green);
        assert!(view.lane(Direction::North).signal.red);
    }

    #[test]
    fn lane_lookup_matches_direction() {
        let view = view();
        for direction in Direction::ALL {
            assert_eq!(view.lane(direction).direction, direction);
        }
    }

    #[test]
    fn summary_lists_phase_and_queues() {
        assert_eq!(view().summary(), "East-West Green 5.0s N3 S0 E12 W8");
    }
}
