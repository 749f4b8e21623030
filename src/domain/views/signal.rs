//! Per-direction signal lamps derived from the current phase.

use serde::Serialize;

use crate::domain::telemetry::{Axis, Direction, SignalPhase};

/// Lamp state for one approach. Exactly one field is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SignalStatus {
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl SignalStatus {
    pub const RED: Self = Self {
        red: true,
        yellow: false,
        green: false,
    };

    pub const YELLOW: Self = Self {
        red: false,
        yellow: true,
        green: false,
    };

    pub const GREEN: Self = Self {
        red: false,
        yellow: false,
        green: true,
    };

    /// Number of lit lamps.
    pub fn lit(&self) -> usize {
        [self.red, self.yellow, self.green]
            .iter()
            .filter(|on| **on)
            .count()
    }
}

/// Signal shown to traffic approaching from `direction`.
///
/// Red phases and an absent phase show red on both axes. There is no input
/// for which this returns green without a matching green phase.
pub fn signal_status(phase: Option<SignalPhase>, direction: Direction) -> SignalStatus {
    let axis = direction.axis();
    match (phase, axis) {
        (Some(SignalPhase::NsGreen), Axis::NorthSouth) => SignalStatus::GREEN,
        (Some(SignalPhase::NsYellow), Axis::NorthSouth) => SignalStatus::YELLOW,
        (Some(SignalPhase::EwGreen), Axis::EastWest) => SignalStatus::GREEN,
        (Some(SignalPhase::EwYellow), Axis::EastWest) => SignalStatus::YELLOW,
        (Some(SignalPhase::NsGreen | SignalPhase::NsYellow), Axis::EastWest)
        | (Some(SignalPhase::EwGreen | SignalPhase::EwYellow), Axis::NorthSouth)
        | (Some(SignalPhase::NsRed | SignalPhase::EwRed), _)
        | (None, _) => SignalStatus::RED,
    }
}

/// Same as [`signal_status`] for a raw wire tag. Unknown tags show red.
pub fn signal_status_for_tag(tag: Option<&str>, direction: Direction) -> SignalStatus {
    signal_status(tag.and_then(SignalPhase::from_tag), direction)
}

/// Human-readable phase name.
pub fn phase_label(phase: Option<SignalPhase>) -> &'static str {
    match phase {
        Some(SignalPhase::NsGreen) => "North-South Green",
        Some(SignalPhase::EwGreen) => "East-West Green",
        Some(SignalPhase::NsYellow) => "North-South Yellow",
        Some(SignalPhase::EwYellow) => "East-West Yellow",
        Some(SignalPhase::NsRed) | Some(SignalPhase::EwRed) => "Transition",
        None => "Unknown",
    }
}
