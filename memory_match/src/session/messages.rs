//! Session actor message types.

use crate::game::{
    SelectionError,
    entities::{GameView, Outcome, Position, RoundId, Ticket},
    state_machine::GameEvent,
};
use tokio::sync::{mpsc, oneshot};

/// Identifies one event subscription on a session.
pub type SubscriberId = u64;

/// Messages that can be sent to a SessionActor
#[derive(Debug)]
pub enum SessionMessage {
    /// Player clicked a board position
    SelectCard {
        position: Position,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Throw the round away and deal a new one
    Restart {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Get a snapshot of the round
    GetView {
        response: oneshot::Sender<GameView>,
    },

    /// Subscribe to game events. The receiver starts with a replay of the
    /// current board.
    Subscribe {
        response: oneshot::Sender<(SubscriberId, mpsc::Receiver<GameEvent>)>,
    },

    /// Unsubscribe from game events
    Unsubscribe { subscriber_id: SubscriberId },

    /// Stop the session
    Close { response: oneshot::Sender<()> },

    /// Internal: reveal delay elapsed for a pair (posted by a timer task)
    Resolve { ticket: Ticket },

    /// Internal: announce delay elapsed for the end of a round
    Announce { round: RoundId, outcome: Outcome },
}

/// Response to a player command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionResponse {
    /// Selection applied
    Accepted,

    /// Selection had no effect
    Ignored(SelectionError),

    /// A new round was dealt
    Restarted { round: RoundId },
}

impl SessionResponse {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SessionResponse::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_accepted_selections_count() {
        assert!(SessionResponse::Accepted.is_accepted());
        assert!(!SessionResponse::Ignored(SelectionError::Locked).is_accepted());
        assert!(!SessionResponse::Restarted { round: 1 }.is_accepted());
    }
}
