//! Game-wide constants.

use super::entities::Chips;

/// Maximum length of user-supplied text fields (usernames, chat lines).
pub const MAX_USER_INPUT_LENGTH: usize = 32;

/// Maximum seats at a single table. Two initial cards per player plus two
/// for the dealer must always fit in a 52-card deck with room to hit.
pub const MAX_PLAYERS: usize = 7;

/// A hand above this total is bust.
pub const BLACKJACK_TOTAL: u16 = 21;

/// The dealer draws while below this total.
pub const DEALER_STAND_TOTAL: u16 = 17;

/// Minimum seated players for the betting phase to run. Below this the
/// round plays out with zero bets.
pub const MIN_PLAYERS_TO_BET: usize = 2;

/// Chips a player sits down with.
pub const DEFAULT_STARTING_CHIPS: Chips = 1000;
