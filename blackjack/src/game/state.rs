//! Canonical per-table game state and the turn/bet phase machine.
//!
//! A [`BlackjackGame`] is the single source of truth for one table: deck,
//! dealer hand, seats, bets, and phase. It is only ever mutated by its
//! table actor, one action at a time; rejected actions return an error and
//! leave the state untouched.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::constants::{
    BLACKJACK_TOTAL, DEALER_STAND_TOTAL, DEFAULT_STARTING_CHIPS, MAX_PLAYERS, MIN_PLAYERS_TO_BET,
};
use super::entities::{
    Card, Chips, Deck, Hand, Player, PlayerId, PlayerStatus, RoundOutcome, Username,
};
use super::evaluator::{hand_value, is_bust};

/// Globally unique table identifier, also the join/routing key.
pub type TableId = Uuid;

/// Stage of a round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Betting,
    PlayerTurns,
    DealerTurn,
    Settled,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Lobby => "lobby",
            Self::Betting => "betting",
            Self::PlayerTurns => "player turns",
            Self::DealerTurn => "dealer turn",
            Self::Settled => "settled",
        };
        write!(f, "{repr}")
    }
}

/// Errors that can occur during table operations.
///
/// Everything except `DeckExhausted` is a local rejection: the request is
/// refused, nothing mutates, nothing is broadcast. `DeckExhausted` is an
/// invariant violation and the table should be torn down.
#[derive(Clone, Debug, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("room does not exist")]
    RoomNotFound,
    #[error("player does not exist")]
    PlayerNotFound,
    #[error("table is full")]
    TableFull,
    #[error("only seated players can start the game")]
    CannotStart,
    #[error("not your turn")]
    NotYourTurn,
    #[error("can't {action} during the {phase} phase")]
    InvalidPhase { action: &'static str, phase: Phase },
    #[error("not part of this round")]
    NotInRound,
    #[error("bet already locked for this round")]
    BetAlreadyLocked,
    #[error("bet must be positive and within your chips")]
    InvalidBet,
    #[error("invalid game state: deck exhausted mid-round")]
    DeckExhausted,
}

impl GameError {
    /// Internal errors mean the table is corrupted and must be closed
    /// rather than patched.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::DeckExhausted)
    }
}

/// Per-table configuration.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSettings {
    pub starting_chips: Chips,
    pub min_players_to_bet: usize,
    pub max_players: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_chips: DEFAULT_STARTING_CHIPS,
            min_players_to_bet: MIN_PLAYERS_TO_BET,
            max_players: MAX_PLAYERS,
        }
    }
}

/// One blackjack table's full state.
#[derive(Clone, Debug, PartialEq)]
pub struct BlackjackGame {
    table_id: TableId,
    deck: Deck,
    dealer_hand: Hand,
    /// Seat order equals join order equals turn order.
    players: Vec<Player>,
    phase: Phase,
    settings: GameSettings,
}

impl BlackjackGame {
    #[must_use]
    pub fn new(table_id: TableId, settings: GameSettings) -> Self {
        let mut deck = Deck::default();
        deck.shuffle();
        Self {
            table_id,
            deck,
            dealer_hand: Vec::new(),
            players: Vec::new(),
            phase: Phase::Lobby,
            settings,
        }
    }

    #[must_use]
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn dealer_hand(&self) -> &[Card] {
        &self.dealer_hand
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    /// Seats that will still be there next round.
    #[must_use]
    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| !p.leaving).count()
    }

    /// Whether the dealer's hole card (and all opposing hands) are open.
    #[must_use]
    pub fn reveal_all(&self) -> bool {
        matches!(self.phase, Phase::DealerTurn | Phase::Settled)
    }

    /// The player whose turn it is, if player turns are running.
    #[must_use]
    pub fn turn_player_id(&self) -> Option<&PlayerId> {
        if self.phase != Phase::PlayerTurns {
            return None;
        }
        self.players
            .iter()
            .find(|p| p.status == PlayerStatus::Playing)
            .map(|p| &p.id)
    }

    /// Seats a player. Idempotent per player id: rejoining refreshes the
    /// username and never duplicates the seat. Returns whether the seat is
    /// new. A joiner during `Betting` is dealt into the round with no bet;
    /// a joiner after the deal waits for the next round.
    pub fn join(&mut self, id: PlayerId, username: Username) -> Result<bool, GameError> {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.username = username;
            player.leaving = false;
            return Ok(false);
        }
        if self.players.len() >= self.settings.max_players {
            return Err(GameError::TableFull);
        }
        info!("{username} ({id}) joined table {}", self.table_id);
        self.players
            .push(Player::new(id, username, self.settings.starting_chips));
        Ok(true)
    }

    /// Removes a player's seat, or queues it for removal.
    ///
    /// In `Lobby`/`Settled` (or before the player was dealt in) the seat
    /// goes away immediately. Mid-round the player is auto-stood and the
    /// seat lingers until the next reset so the turn order and settlement
    /// stay consistent.
    pub fn leave(&mut self, id: &PlayerId) -> Result<(), GameError> {
        let idx = self
            .players
            .iter()
            .position(|p| &p.id == id)
            .ok_or(GameError::PlayerNotFound)?;

        let in_round = !matches!(self.phase, Phase::Lobby | Phase::Settled)
            && !self.players[idx].hand.is_empty();
        let betting_pending =
            self.phase == Phase::Betting && self.players[idx].status == PlayerStatus::Betting;

        if in_round {
            let player = &mut self.players[idx];
            player.leaving = true;
            if player.status == PlayerStatus::Playing {
                info!("{} left mid-round, auto-stay", player.id);
                player.status = PlayerStatus::Stood;
                self.finish_player_turns_if_done()?;
            }
        } else {
            let player = self.players.remove(idx);
            info!("{} ({}) left table {}", player.username, player.id, self.table_id);
            if betting_pending {
                // Their missing bet no longer holds up the deal.
                self.close_betting_if_all_locked()?;
            }
        }
        Ok(())
    }

    /// Explicit start signal from a seated player.
    ///
    /// In `Lobby`: opens betting when enough players are seated, otherwise
    /// deals straight into player turns with zero bets. In `Betting`: force
    /// closes betting, dealing players without a locked bet in at zero.
    pub fn start(&mut self, id: &PlayerId) -> Result<(), GameError> {
        if !self.players.iter().any(|p| &p.id == id && !p.leaving) {
            return Err(GameError::CannotStart);
        }
        match self.phase {
            Phase::Lobby => {
                if self.active_player_count() >= self.settings.min_players_to_bet {
                    self.phase = Phase::Betting;
                    for player in self.players.iter_mut().filter(|p| !p.leaving) {
                        player.status = PlayerStatus::Betting;
                    }
                    debug!("table {} betting opened", self.table_id);
                    Ok(())
                } else {
                    // Betting is disabled below the threshold; play for zero.
                    self.deal_round()
                }
            }
            Phase::Betting => self.deal_round(),
            phase => Err(GameError::InvalidPhase {
                action: "start",
                phase,
            }),
        }
    }

    /// Locks one bet for the round. Auto-closes betting once every seated
    /// player in the round has locked one.
    pub fn place_bet(&mut self, id: &PlayerId, amount: Chips) -> Result<(), GameError> {
        if self.phase != Phase::Betting {
            return Err(GameError::InvalidPhase {
                action: "bet",
                phase: self.phase,
            });
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == id && !p.leaving)
            .ok_or(GameError::PlayerNotFound)?;
        if player.status != PlayerStatus::Betting {
            return Err(GameError::NotInRound);
        }
        if player.bet.is_some() {
            return Err(GameError::BetAlreadyLocked);
        }
        if amount == 0 || amount > player.chips {
            return Err(GameError::InvalidBet);
        }
        player.chips -= amount;
        player.bet = Some(amount);
        debug!("{id} bet {amount} at table {}", self.table_id);
        self.close_betting_if_all_locked()
    }

    /// Deals one card to the turn player. A bust ends their turn.
    pub fn hit(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.check_turn(id, "hit")?;
        let card = self.deck.deal_card().ok_or(GameError::DeckExhausted)?;
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(GameError::PlayerNotFound)?;
        player.hand.push(card);
        if is_bust(&player.hand) {
            debug!("{id} busted at {}", hand_value(&player.hand));
            player.status = PlayerStatus::Busted;
        }
        self.finish_player_turns_if_done()
    }

    /// Ends the turn player's turn.
    pub fn stay(&mut self, id: &PlayerId) -> Result<(), GameError> {
        self.check_turn(id, "stay")?;
        let player = self
            .players
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(GameError::PlayerNotFound)?;
        player.status = PlayerStatus::Stood;
        self.finish_player_turns_if_done()
    }

    /// Starts a fresh round: queued leavers removed, hands and bets
    /// cleared, deck reshuffled, everyone back to `Waiting` in the lobby.
    pub fn reset(&mut self, id: &PlayerId) -> Result<(), GameError> {
        if !self.players.iter().any(|p| &p.id == id) {
            return Err(GameError::PlayerNotFound);
        }
        if self.phase != Phase::Settled {
            return Err(GameError::InvalidPhase {
                action: "reset",
                phase: self.phase,
            });
        }
        self.players.retain(|p| !p.leaving);
        for player in &mut self.players {
            player.hand.clear();
            player.bet = None;
            player.outcome = None;
            player.status = PlayerStatus::Waiting;
        }
        self.dealer_hand.clear();
        self.deck.shuffle();
        self.phase = Phase::Lobby;
        info!("table {} reset for a new round", self.table_id);
        Ok(())
    }

    fn check_turn(&self, id: &PlayerId, action: &'static str) -> Result<(), GameError> {
        if self.phase != Phase::PlayerTurns {
            return Err(GameError::InvalidPhase {
                action,
                phase: self.phase,
            });
        }
        if !self.players.iter().any(|p| &p.id == id) {
            return Err(GameError::PlayerNotFound);
        }
        match self.turn_player_id() {
            Some(turn_id) if turn_id == id => Ok(()),
            _ => Err(GameError::NotYourTurn),
        }
    }

    fn close_betting_if_all_locked(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::Betting {
            return Ok(());
        }
        // Only seats in the betting status hold up the deal; a seat taken
        // mid-betting stays `Waiting` and is dealt in with no bet.
        let all_locked = self
            .players
            .iter()
            .filter(|p| !p.leaving && p.status == PlayerStatus::Betting)
            .all(|p| p.bet.is_some());
        if all_locked { self.deal_round() } else { Ok(()) }
    }

    /// Two cards each, two to the dealer, then player turns in join order.
    fn deal_round(&mut self) -> Result<(), GameError> {
        for idx in 0..self.players.len() {
            if self.players[idx].leaving {
                continue;
            }
            let first = self.deck.deal_card().ok_or(GameError::DeckExhausted)?;
            let second = self.deck.deal_card().ok_or(GameError::DeckExhausted)?;
            let player = &mut self.players[idx];
            player.hand.push(first);
            player.hand.push(second);
            player.status = PlayerStatus::Playing;
        }
        for _ in 0..2 {
            let card = self.deck.deal_card().ok_or(GameError::DeckExhausted)?;
            self.dealer_hand.push(card);
        }
        self.phase = Phase::PlayerTurns;
        info!("table {} dealt, player turns begin", self.table_id);
        Ok(())
    }

    fn finish_player_turns_if_done(&mut self) -> Result<(), GameError> {
        if self.phase != Phase::PlayerTurns || self.turn_player_id().is_some() {
            return Ok(());
        }
        self.phase = Phase::DealerTurn;
        // Fixed house rule: draw while below 17. Fully automatic.
        while hand_value(&self.dealer_hand) < DEALER_STAND_TOTAL {
            let card = self.deck.deal_card().ok_or(GameError::DeckExhausted)?;
            self.dealer_hand.push(card);
        }
        debug!(
            "table {} dealer stands at {}",
            self.table_id,
            hand_value(&self.dealer_hand)
        );
        self.settle();
        Ok(())
    }

    fn settle(&mut self) {
        let dealer_total = hand_value(&self.dealer_hand);
        let dealer_bust = dealer_total > BLACKJACK_TOTAL;
        for player in self.players.iter_mut().filter(|p| !p.hand.is_empty()) {
            let total = hand_value(&player.hand);
            let outcome = if player.status == PlayerStatus::Busted {
                // A bust loses no matter what the dealer does.
                RoundOutcome::Lose
            } else if dealer_bust || total > dealer_total {
                RoundOutcome::Win
            } else if total == dealer_total {
                RoundOutcome::Push
            } else {
                RoundOutcome::Lose
            };
            let bet = player.bet.unwrap_or(0);
            match outcome {
                RoundOutcome::Win => player.chips += 2 * bet,
                RoundOutcome::Push => player.chips += bet,
                RoundOutcome::Lose => {}
            }
            player.outcome = Some(outcome);
            player.status = PlayerStatus::Settled;
            info!("{}: {} (total {})", player.id, outcome, total);
        }
        self.phase = Phase::Settled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::Suit::{Club, Diamond, Heart, Spade};

    fn game_with(players: &[&str]) -> BlackjackGame {
        let mut game = BlackjackGame::new(Uuid::new_v4(), GameSettings::default());
        for name in players {
            game.join(PlayerId::new(*name), Username::new(name)).unwrap();
        }
        game
    }

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    #[test]
    fn join_is_idempotent() {
        let mut game = game_with(&["alice"]);
        let new_seat = game
            .join(pid("alice"), Username::new("alice_renamed"))
            .unwrap();
        assert!(!new_seat);
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.players()[0].username.to_string(), "alice_renamed");
    }

    #[test]
    fn table_capacity_is_enforced() {
        let mut game = BlackjackGame::new(
            Uuid::new_v4(),
            GameSettings {
                max_players: 2,
                ..GameSettings::default()
            },
        );
        game.join(pid("a"), Username::new("a")).unwrap();
        game.join(pid("b"), Username::new("b")).unwrap();
        assert_eq!(
            game.join(pid("c"), Username::new("c")),
            Err(GameError::TableFull)
        );
    }

    #[test]
    fn solo_start_skips_betting() {
        let mut game = game_with(&["alice"]);
        game.start(&pid("alice")).unwrap();
        assert_eq!(game.phase(), Phase::PlayerTurns);
        assert_eq!(game.players()[0].hand.len(), 2);
        assert_eq!(game.players()[0].bet, None);
        assert_eq!(game.dealer_hand().len(), 2);
    }

    #[test]
    fn betting_opens_with_two_players_and_autocloses() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        assert_eq!(game.phase(), Phase::Betting);

        game.place_bet(&pid("alice"), 10).unwrap();
        assert_eq!(game.phase(), Phase::Betting);
        game.place_bet(&pid("bob"), 25).unwrap();
        // Last lock closes betting and deals.
        assert_eq!(game.phase(), Phase::PlayerTurns);
        assert_eq!(game.players()[0].chips, DEFAULT_STARTING_CHIPS - 10);
        assert_eq!(game.players()[1].chips, DEFAULT_STARTING_CHIPS - 25);
    }

    #[test]
    fn bets_lock_on_submission() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 10).unwrap();
        assert_eq!(
            game.place_bet(&pid("alice"), 20),
            Err(GameError::BetAlreadyLocked)
        );
    }

    #[test]
    fn invalid_bets_rejected() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        assert_eq!(game.place_bet(&pid("alice"), 0), Err(GameError::InvalidBet));
        assert_eq!(
            game.place_bet(&pid("alice"), DEFAULT_STARTING_CHIPS + 1),
            Err(GameError::InvalidBet)
        );
    }

    #[test]
    fn mid_betting_joiner_is_dealt_in_with_no_bet() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.join(pid("carol"), Username::new("carol")).unwrap();

        // Carol holds no betting status, so she cannot bet and does not
        // hold up the deal.
        assert_eq!(
            game.place_bet(&pid("carol"), 10),
            Err(GameError::NotInRound)
        );
        game.place_bet(&pid("alice"), 10).unwrap();
        game.place_bet(&pid("bob"), 10).unwrap();

        assert_eq!(game.phase(), Phase::PlayerTurns);
        let carol = &game.players()[2];
        assert_eq!(carol.hand.len(), 2);
        assert_eq!(carol.bet, None);
        assert_eq!(carol.status, PlayerStatus::Playing);
    }

    #[test]
    fn start_force_closes_betting() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 10).unwrap();
        // Bob never bets; alice's start signal closes the round anyway.
        game.start(&pid("alice")).unwrap();
        assert_eq!(game.phase(), Phase::PlayerTurns);
        assert_eq!(game.players()[1].bet, None);
        assert_eq!(game.players()[1].hand.len(), 2);
    }

    #[test]
    fn unseated_player_cannot_start() {
        let mut game = game_with(&["alice"]);
        assert_eq!(game.start(&pid("mallory")), Err(GameError::CannotStart));
    }

    #[test]
    fn turn_order_follows_join_order() {
        let mut game = game_with(&["alice", "bob", "carol"]);
        game.start(&pid("alice")).unwrap();
        for name in ["alice", "bob", "carol"] {
            game.place_bet(&pid(name), 10).unwrap();
        }
        assert_eq!(game.turn_player_id(), Some(&pid("alice")));
        game.stay(&pid("alice")).unwrap();
        assert_eq!(game.turn_player_id(), Some(&pid("bob")));
        game.stay(&pid("bob")).unwrap();
        assert_eq!(game.turn_player_id(), Some(&pid("carol")));
        game.stay(&pid("carol")).unwrap();
        assert_eq!(game.phase(), Phase::Settled);
    }

    #[test]
    fn out_of_turn_action_leaves_state_unchanged() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 10).unwrap();
        game.place_bet(&pid("bob"), 10).unwrap();

        let before = game.clone();
        assert_eq!(game.hit(&pid("bob")), Err(GameError::NotYourTurn));
        assert_eq!(game.stay(&pid("bob")), Err(GameError::NotYourTurn));
        assert_eq!(game, before);
    }

    #[test]
    fn action_outside_phase_leaves_state_unchanged() {
        let mut game = game_with(&["alice", "bob"]);
        let before = game.clone();
        assert!(matches!(
            game.hit(&pid("alice")),
            Err(GameError::InvalidPhase { .. })
        ));
        assert!(matches!(
            game.place_bet(&pid("alice"), 10),
            Err(GameError::InvalidPhase { .. })
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn dealer_draw_is_deterministic_given_deck_order() {
        let mut game = game_with(&["alice"]);
        // Deal order: alice's two, dealer's two, then draws.
        game.deck.stack_top(&[
            Card(10, Club),
            Card(9, Club),
            Card(7, Spade),  // dealer: 7 + 5 = 12
            Card(5, Heart),
            Card(9, Diamond), // dealer draws to 21
        ]);
        game.start(&pid("alice")).unwrap();
        game.stay(&pid("alice")).unwrap();

        assert_eq!(
            game.dealer_hand(),
            &[Card(7, Spade), Card(5, Heart), Card(9, Diamond)]
        );
        assert_eq!(hand_value(game.dealer_hand()), 21);
        assert!(hand_value(game.dealer_hand()) >= DEALER_STAND_TOTAL);
    }

    #[test]
    fn busted_player_loses_regardless_of_dealer() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 10).unwrap();
        game.deck.stack_top(&[
            Card(13, Club),   // alice: K
            Card(12, Club),   // alice: Q -> 20
            Card(13, Heart),  // bob: K
            Card(9, Heart),   // bob: 9 -> 19
            Card(10, Spade),  // dealer: 10
            Card(6, Spade),   // dealer: 6 -> 16
            Card(2, Diamond), // alice hit -> 22, bust
            Card(4, Diamond), // dealer draws -> 20
        ]);
        game.place_bet(&pid("bob"), 10).unwrap();

        game.hit(&pid("alice")).unwrap();
        assert_eq!(game.players()[0].status, PlayerStatus::Busted);
        // Bust ends alice's turn.
        assert_eq!(game.turn_player_id(), Some(&pid("bob")));
        game.stay(&pid("bob")).unwrap();

        assert_eq!(game.phase(), Phase::Settled);
        assert_eq!(hand_value(game.dealer_hand()), 20);
        assert_eq!(game.players()[0].outcome, Some(RoundOutcome::Lose));
        // Bob's 19 loses to the dealer's 20.
        assert_eq!(game.players()[1].outcome, Some(RoundOutcome::Lose));
    }

    #[test]
    fn settlement_pays_wins_and_pushes() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 100).unwrap();
        game.deck.stack_top(&[
            Card(13, Club),  // alice: K
            Card(9, Club),   // alice: 9 -> 19
            Card(13, Heart), // bob: K
            Card(8, Heart),  // bob: 8 -> 18
            Card(10, Spade), // dealer: 10
            Card(8, Spade),  // dealer: 8 -> 18, stands
        ]);
        game.place_bet(&pid("bob"), 50).unwrap();

        game.stay(&pid("alice")).unwrap();
        game.stay(&pid("bob")).unwrap();

        let alice = &game.players()[0];
        let bob = &game.players()[1];
        assert_eq!(alice.outcome, Some(RoundOutcome::Win));
        assert_eq!(alice.chips, DEFAULT_STARTING_CHIPS + 100);
        assert_eq!(bob.outcome, Some(RoundOutcome::Push));
        assert_eq!(bob.chips, DEFAULT_STARTING_CHIPS);
    }

    #[test]
    fn reset_returns_to_lobby_with_seats_kept() {
        let mut game = game_with(&["alice"]);
        game.start(&pid("alice")).unwrap();
        game.stay(&pid("alice")).unwrap();
        assert_eq!(game.phase(), Phase::Settled);

        game.reset(&pid("alice")).unwrap();
        assert_eq!(game.phase(), Phase::Lobby);
        assert_eq!(game.players().len(), 1);
        assert!(game.players()[0].hand.is_empty());
        assert_eq!(game.players()[0].bet, None);
        assert_eq!(game.players()[0].outcome, None);
        assert_eq!(game.players()[0].status, PlayerStatus::Waiting);
        assert!(game.dealer_hand().is_empty());
        assert_eq!(game.deck_remaining(), 52);
    }

    #[test]
    fn leave_in_lobby_removes_seat_immediately() {
        let mut game = game_with(&["alice", "bob"]);
        game.leave(&pid("alice")).unwrap();
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.active_player_count(), 1);
    }

    #[test]
    fn leave_mid_round_auto_stays_and_removes_at_reset() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 10).unwrap();
        game.place_bet(&pid("bob"), 10).unwrap();

        // Alice leaves on her own turn: auto-stay, bob plays on.
        game.leave(&pid("alice")).unwrap();
        assert_eq!(game.players().len(), 2);
        assert_eq!(game.players()[0].status, PlayerStatus::Stood);
        assert_eq!(game.turn_player_id(), Some(&pid("bob")));

        game.stay(&pid("bob")).unwrap();
        assert_eq!(game.phase(), Phase::Settled);
        // Alice still settles with an outcome.
        assert!(game.players()[0].outcome.is_some());

        game.reset(&pid("bob")).unwrap();
        assert_eq!(game.players().len(), 1);
        assert_eq!(game.players()[0].id, pid("bob"));
    }

    #[test]
    fn leave_during_betting_unblocks_the_deal() {
        let mut game = game_with(&["alice", "bob"]);
        game.start(&pid("alice")).unwrap();
        game.place_bet(&pid("alice"), 10).unwrap();
        // Bob bails without betting; the deal no longer waits on him.
        game.leave(&pid("bob")).unwrap();
        assert_eq!(game.phase(), Phase::PlayerTurns);
        assert_eq!(game.players().len(), 1);
    }

    #[test]
    fn unknown_player_actions_are_not_found() {
        let mut game = game_with(&["alice"]);
        game.start(&pid("alice")).unwrap();
        assert_eq!(game.hit(&pid("ghost")), Err(GameError::PlayerNotFound));
        assert_eq!(game.leave(&pid("ghost")), Err(GameError::PlayerNotFound));
    }
}
