//! LinkState - lifecycle of one connection attempt.

use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where the duplex channel is in its lifecycle.
///
/// ```text
/// Disconnected --> Connecting --> Connected --> Disconnected
///                      |                            ^
///                      +----------------------------+
/// ```
///
/// There is no automatic edge back to `Connecting`: a new attempt is always
/// started explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl StateMachine for LinkState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use LinkState::*;
        matches!(
            (self, target),
            (Disconnected, Connecting)
                | (Connecting, Connected)
                | (Connecting, Disconnected)
                | (Connected, Disconnected)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LinkState::*;
        match self {
            Disconnected => vec![Connecting],
            Connecting => vec![Connected, Disconnected],
            Connected => vec![Disconnected],
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkState::Disconnected => "disconnected",
            LinkState::Connecting => "connecting",
            LinkState::Connected => "connected",
        };
        write!(f, "{}", s)
    }
}
