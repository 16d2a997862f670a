//! Per-viewer snapshot projection.
//!
//! The canonical table state is never sent over the wire directly; every
//! broadcast goes through [`project`], which masks the dealer hole card
//! and opposing hands for one viewer. The projection is a pure read and
//! fully supersedes any previous snapshot the viewer holds, so clients
//! keep no turn/phase state of their own.

use serde::{Deserialize, Serialize};

use super::entities::{Card, Chips, PlayerId, PlayerStatus, RoundOutcome, Username};
use super::evaluator::hand_value;
use super::state::{BlackjackGame, Phase, TableId};

/// A card as one viewer sees it. `Hidden` leaks nothing but the card's
/// existence.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "card", rename_all = "snake_case")]
pub enum CardView {
    Up(Card),
    Hidden,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealerView {
    pub cards: Vec<CardView>,
    /// Only reported once the dealer's hand is fully visible.
    pub total: Option<u16>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SeatView {
    pub player_id: PlayerId,
    pub username: Username,
    pub cards: Vec<CardView>,
    /// Only reported for fully visible hands.
    pub total: Option<u16>,
    pub chips: Chips,
    pub bet: Option<Chips>,
    pub status: PlayerStatus,
    pub outcome: Option<RoundOutcome>,
}

/// What one viewer is allowed to see of a table, recomputed on every
/// broadcast and never persisted.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TableSnapshot {
    pub table_id: TableId,
    pub phase: Phase,
    pub turn_player_id: Option<PlayerId>,
    pub dealer: DealerView,
    pub seats: Vec<SeatView>,
    pub deck_count: usize,
}

/// Projects the canonical state for `viewer`.
///
/// The viewer's own hand is always open. The dealer shows only the first
/// dealt card, and opponents show only hand sizes, until the table-wide
/// reveal (dealer turn or settlement).
#[must_use]
pub fn project(game: &BlackjackGame, viewer: &PlayerId) -> TableSnapshot {
    let reveal = game.reveal_all();

    let dealer_cards: Vec<CardView> = game
        .dealer_hand()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            if reveal || i == 0 {
                CardView::Up(*card)
            } else {
                CardView::Hidden
            }
        })
        .collect();
    let dealer = DealerView {
        total: reveal.then(|| hand_value(game.dealer_hand())),
        cards: dealer_cards,
    };

    let seats = game
        .players()
        .iter()
        .map(|player| {
            let visible = reveal || &player.id == viewer;
            let cards = player
                .hand
                .iter()
                .map(|card| {
                    if visible {
                        CardView::Up(*card)
                    } else {
                        CardView::Hidden
                    }
                })
                .collect();
            SeatView {
                player_id: player.id.clone(),
                username: player.username.clone(),
                cards,
                total: visible.then(|| hand_value(&player.hand)),
                chips: player.chips,
                bet: player.bet,
                status: player.status,
                outcome: player.outcome,
            }
        })
        .collect();

    TableSnapshot {
        table_id: game.table_id(),
        phase: game.phase(),
        turn_player_id: game.turn_player_id().cloned(),
        dealer,
        seats,
        deck_count: game.deck_remaining(),
    }
}
