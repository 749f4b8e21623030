//! Simulation tick: the intersection state at one instant of simulated time.

use serde::{Deserialize, Serialize};

use super::{Direction, SignalPhase};

/// Queue length per approach, in vehicles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueCounts {
    #[serde(rename = "northQueue")]
    pub north: u32,
    #[serde(rename = "southQueue")]
    pub south: u32,
    #[serde(rename = "eastQueue")]
    pub east: u32,
    #[serde(rename = "westQueue")]
    pub west: u32,
}

impl QueueCounts {
    /// Returns the queue length for one approach.
    pub fn for_direction(&self, direction: Direction) -> u32 {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
        }
    }

    /// Sum of all four queues.
    pub fn total(&self) -> u64 {
        u64::from(self.north) + u64::from(self.south) + u64::from(self.east) + u64::from(self.west)
    }
}

/// One vehicle tracked by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub lane: Direction,
    pub position: f64,
    pub speed: f64,
}

/// Signal and queue state of the intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intersection {
    #[serde(flatten)]
    pub queues: QueueCounts,
    pub current_phase: SignalPhase,
    /// Seconds left in the current phase.
    pub phase_time_remaining: f64,
    pub vehicles: Vec<Vehicle>,
}

/// Simulation clock plus intersection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationTick {
    /// Seconds of simulated time, monotonic within a session.
    pub simulation_time: f64,
    pub cycle_number: u64,
    pub intersection: Intersection,
}

impl SimulationTick {
    /// Vehicles currently on one approach.
    pub fn vehicles_on(&self, direction: Direction) -> impl Iterator<Item = &Vehicle> {
        self.intersection
            .vehicles
            .iter()
            .filter(move |v| v.lane == direction)
    }
}
