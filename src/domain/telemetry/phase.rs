//! SignalPhase enum - which axis currently holds right-of-way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Traffic-signal phase reported by the simulation.
///
/// The wire tags are `NS_GREEN`, `EW_GREEN`, `NS_YELLOW`, `EW_YELLOW`,
/// `NS_RED` and `EW_RED`. Any other tag is rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalPhase {
    NsGreen,
    EwGreen,
    NsYellow,
    EwYellow,
    NsRed,
    EwRed,
}

impl SignalPhase {
    /// Every phase, in wire-tag order.
    pub const ALL: [SignalPhase; 6] = [
        SignalPhase::NsGreen,
        SignalPhase::EwGreen,
        SignalPhase::NsYellow,
        SignalPhase::EwYellow,
        SignalPhase::NsRed,
        SignalPhase::EwRed,
    ];

    /// Wire tags accepted by [`SignalPhase::from_tag`].
    pub const TAGS: [&'static str; 6] = [
        "NS_GREEN",
        "EW_GREEN",
        "NS_YELLOW",
        "EW_YELLOW",
        "NS_RED",
        "EW_RED",
    ];

    /// Parses a wire tag. Returns `None` for anything outside the closed set.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NS_GREEN" => Some(SignalPhase::NsGreen),
            "EW_GREEN" => Some(SignalPhase::EwGreen),
            "NS_YELLOW" => Some(SignalPhase::NsYellow),
            "EW_YELLOW" => Some(SignalPhase::EwYellow),
            "NS_RED" => Some(SignalPhase::NsRed),
            "EW_RED" => Some(SignalPhase::EwRed),
            _ => None,
        }
    }

    /// Returns the wire tag.
    pub fn as_tag(&self) -> &'static str {
        match self {
            SignalPhase::NsGreen => "NS_GREEN",
            SignalPhase::EwGreen => "EW_GREEN",
            SignalPhase::NsYellow => "NS_YELLOW",
            SignalPhase::EwYellow => "EW_YELLOW",
            SignalPhase::NsRed => "NS_RED",
            SignalPhase::EwRed => "EW_RED",
        }
    }
}

impl fmt::Display for SignalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phase_round_trips_through_its_tag() {
        for phase in SignalPhase::ALL {
            assert_eq!(SignalPhase::from_tag(phase.as_tag()), Some(phase));
        }
    }

    #[test]
    fn tags_table_matches_variants() {
        let tags: Vec<&str> = SignalPhase::ALL.iter().map(|p| p.as_tag()).collect();
        assert_eq!(tags, SignalPhase::TAGS.to_vec());
    }

    #[test]
    fn unknown_tags_are_rejected() {
        assert_eq!(SignalPhase::from_tag("ns_green"), None);
        assert_eq!(SignalPhase::from_tag("ALL_RED"), None);
        assert_eq!(SignalPhase::from_tag(""), None);
    }

    #[test]
    fn serde_uses_wire_tags() {
        assert_eq!(
            serde_json::to_string(&SignalPhase::NsYellow).unwrap(),
            "\"NS_YELLOW\""
        );
        let phase: SignalPhase = serde_json::from_str("\"EW_GREEN\"").unwrap();
        assert_eq!(phase, SignalPhase::EwGreen);
    }
}
