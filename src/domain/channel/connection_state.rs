//! Connection state of a live channel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle of the one logical connection a channel owns.
///
/// A channel starts `Closed`. Only the channel itself mutates its state,
/// and only through the transitions below.
///
/// ```text
/// Closed ──> Connecting ──> Open
///   ^            │           │
///   └────────────┴───────────┘
/// Open ──> Connecting   (explicit reconnect replaces the transport)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionState {
    /// A transport connection attempt is in flight.
    Connecting,

    /// The transport is connected; sends are transmitted.
    Open,

    /// No live transport. Either not yet opened, explicitly closed,
    /// waiting for a reconnect timer, or retries are exhausted.
    #[default]
    Closed,
}

impl ConnectionState {
    /// Returns true if outbound messages can be transmitted.
    pub fn is_open(&self) -> bool {
        matches!(self, ConnectionState::Open)
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Closed, Connecting)
                | (Connecting, Open)
                | (Connecting, Closed)
                | (Open, Closed)
                | (Open, Connecting)
        )
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Open => "OPEN",
            ConnectionState::Closed => "CLOSED",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_closed() {
        assert_eq!(ConnectionState::default(), ConnectionState::Closed);
    }

    #[test]
    fn only_open_is_open() {
        assert!(ConnectionState::Open.is_open());
        assert!(!ConnectionState::Connecting.is_open());
        assert!(!ConnectionState::Closed.is_open());
    }

    #[test]
    fn closed_cannot_jump_straight_to_open() {
        assert!(ConnectionState::Closed
            .transition_to(ConnectionState::Open)
            .is_err());
    }

    #[test]
    fn connect_cycle_transitions_are_valid() {
        let state = ConnectionState::Closed;
        let state = state.transition_to(ConnectionState::Connecting).unwrap();
        let state = state.transition_to(ConnectionState::Open).unwrap();
        let state = state.transition_to(ConnectionState::Closed).unwrap();
        assert_eq!(state, ConnectionState::Closed);
    }

    #[test]
    fn every_state_can_be_left() {
        use ConnectionState::*;
        let all = [Connecting, Open, Closed];
        for from in all {
            assert!(
                all.iter().any(|to| from.can_transition_to(to)),
                "{:?} has no way out",
                from
            );
        }
    }

    #[test]
    fn rejected_transition_names_both_states() {
        let err = ConnectionState::Connecting
            .transition_to(ConnectionState::Connecting)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field 'state_transition' has invalid format: Connecting cannot move to Connecting"
        );
    }

    #[test]
    fn explicit_reconnect_may_leave_open() {
        assert_eq!(
            ConnectionState::Open.transition_to(ConnectionState::Connecting),
            Ok(ConnectionState::Connecting)
        );
    }

    #[test]
    fn serializes_in_upper_case() {
        let json = serde_json::to_string(&ConnectionState::Connecting).unwrap();
        assert_eq!(json, r#""CONNECTING""#);
        assert_eq!(ConnectionState::Open.to_string(), "OPEN");
    }
}
