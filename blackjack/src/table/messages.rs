//! Table actor message types.

use tokio::sync::{mpsc, oneshot};

use crate::game::entities::{Chips, PlayerId, Username};
use crate::game::{GameError, Phase, TableId, TableSnapshot};

/// Messages that can be sent to a table actor. Each request carries a
/// oneshot sender so the result flows back to the caller only.
#[derive(Debug)]
pub enum TableMessage {
    /// Seat a player (idempotent per player id).
    Join {
        player_id: PlayerId,
        username: Username,
        response: oneshot::Sender<Result<bool, GameError>>,
    },

    /// Remove a player's seat (mid-round: auto-stay, removed at reset).
    Leave {
        player_id: PlayerId,
        response: oneshot::Sender<Result<LeaveOutcome, GameError>>,
    },

    /// Explicit start signal: opens betting or deals the round.
    Start {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Lock a bet for the round.
    PlaceBet {
        player_id: PlayerId,
        amount: Chips,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    Hit {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    Stay {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Clear the settled round and return to the lobby.
    ResetRound {
        player_id: PlayerId,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Relay a table-scoped chat line to all subscribers.
    Chat {
        player_id: PlayerId,
        text: String,
        response: oneshot::Sender<Result<(), GameError>>,
    },

    /// Current state as seen by one viewer.
    GetSnapshot {
        player_id: PlayerId,
        response: oneshot::Sender<TableSnapshot>,
    },

    /// Lightweight summary for table discovery.
    Describe {
        response: oneshot::Sender<TableSummary>,
    },

    /// Subscribe to this table's outbound events.
    Subscribe {
        player_id: PlayerId,
        sender: mpsc::Sender<TableEvent>,
    },

    /// Unsubscribe from outbound events.
    Unsubscribe { player_id: PlayerId },

    /// Stop the actor.
    Close { response: oneshot::Sender<()> },
}

/// Result of a leave request.
#[derive(Clone, Copy, Debug)]
pub struct LeaveOutcome {
    /// No seats will survive into the next round; the table is eligible
    /// for teardown.
    pub table_empty: bool,
}

/// Summary used by the room list endpoint.
#[derive(Clone, Debug, serde::Serialize)]
pub struct TableSummary {
    pub table_id: TableId,
    pub player_count: usize,
    pub phase: Phase,
}

/// Events fanned out to subscribers.
///
/// `State` carries a full per-viewer snapshot; it completely supersedes
/// any earlier snapshot the viewer holds.
#[derive(Clone, Debug)]
pub enum TableEvent {
    State(TableSnapshot),
    BetPlaced { player_id: PlayerId, amount: Chips },
    Chat { username: Username, text: String },
    Closed,
}
