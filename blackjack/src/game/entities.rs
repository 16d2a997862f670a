use rand::seq::SliceRandom;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
    // Wild is used to initialize a deck of cards.
    Wild,
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Wild => "w",
        };
        write!(f, "{repr}")
    }
}

/// Placeholder for card values.
pub type Value = u8;

/// A card is a tuple of a uInt8 value (ace=1u8, jack=11u8, queen=12u8,
/// king=13u8) and a suit. Rank-to-total mapping is the evaluator's job.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Value, pub Suit);

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self.0 {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{value}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

/// An ordered hand of cards. Append-only during a round; cleared only at
/// round reset.
pub type Hand = Vec<Card>;

/// Cards are consumed from one end and never replenished mid-round. The
/// deck is reshuffled whenever a new round starts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deck {
    cards: [Card; 52],
    pub deck_idx: usize,
}

impl Deck {
    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.deck_idx).copied();
        self.deck_idx += 1;
        card
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        self.deck_idx = 0;
    }

    pub fn remaining(&self) -> usize {
        52usize.saturating_sub(self.deck_idx)
    }

    /// Places `cards` so they are dealt next, in order. Test hook for
    /// deterministic draws.
    #[cfg(test)]
    pub(crate) fn stack_top(&mut self, cards: &[Card]) {
        for (i, card) in cards.iter().enumerate() {
            self.cards[self.deck_idx + i] = *card;
        }
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards: [Card; 52] = [Card(0, Suit::Wild); 52];
        for (i, value) in (1u8..14u8).enumerate() {
            for (j, suit) in [Suit::Club, Suit::Spade, Suit::Diamond, Suit::Heart]
                .into_iter()
                .enumerate()
            {
                cards[4 * i + j] = Card(value, suit);
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Type alias for whole chips. All bets and balances are whole chips;
/// there's no point arguing over fractions of a chip.
pub type Chips = u32;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Username(String);

impl Username {
    pub fn new(s: &str) -> Self {
        // Truncate by characters, not bytes; names arrive straight off
        // the wire and may be multibyte.
        let username: String = s
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .take(constants::MAX_USER_INPUT_LENGTH / 2)
            .collect();
        Self(username)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// Opaque, client-supplied identifier. Stable across reconnects and
/// unique per table.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where a player is within the current round.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// Seated, not part of the round in progress (or no round yet).
    Waiting,
    /// Round is in the betting phase and this player may lock a bet.
    Betting,
    /// Dealt in and still able to hit.
    Playing,
    Stood,
    Busted,
    /// Round is over and `outcome` is recorded.
    Settled,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Betting => "betting",
            Self::Playing => "playing",
            Self::Stood => "stood",
            Self::Busted => "busted",
            Self::Settled => "settled",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Lose,
    Push,
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Push => "push",
        };
        write!(f, "{repr}")
    }
}

/// A seated player. Exclusively owned by its table; vector position in
/// the table equals join order equals turn order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub username: Username,
    pub hand: Hand,
    pub chips: Chips,
    /// Locked for the round once set; cleared at round reset.
    pub bet: Option<Chips>,
    pub status: PlayerStatus,
    pub outcome: Option<RoundOutcome>,
    /// Set when the player leaves mid-round. The seat is kept (auto-stay
    /// policy) and removed at the next round reset.
    pub leaving: bool,
}

impl Player {
    pub fn new(id: PlayerId, username: Username, chips: Chips) -> Self {
        Self {
            id,
            username,
            hand: Vec::new(),
            chips,
            bet: None,
            status: PlayerStatus::Waiting,
            outcome: None,
            leaving: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deck_has_52_unique_cards() {
        let mut deck = Deck::default();
        let mut seen = std::collections::HashSet::new();
        while let Some(card) = deck.deal_card() {
            assert!(seen.insert(card), "duplicate card {card}");
        }
        assert_eq!(seen.len(), 52);
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn shuffle_resets_consumption() {
        let mut deck = Deck::default();
        for _ in 0..10 {
            deck.deal_card();
        }
        assert_eq!(deck.remaining(), 42);
        deck.shuffle();
        assert_eq!(deck.remaining(), 52);
    }

    #[test]
    fn exhausted_deck_deals_none() {
        let mut deck = Deck::default();
        for _ in 0..52 {
            assert!(deck.deal_card().is_some());
        }
        assert!(deck.deal_card().is_none());
    }

    #[test]
    fn username_sanitizes_whitespace_and_truncates() {
        let username = Username::new("a b\tc");
        assert_eq!(username.to_string(), "a_b_c");

        let long = "x".repeat(100);
        let username = Username::new(&long);
        assert_eq!(
            username.to_string().len(),
            constants::MAX_USER_INPUT_LENGTH / 2
        );
    }

    #[test]
    fn username_truncates_multibyte_names_on_char_boundaries() {
        // Short multibyte names pass through untouched.
        let username = Username::new(&"あ".repeat(7));
        assert_eq!(username.to_string(), "あ".repeat(7));

        // Long ones cut at a character count, never inside a character.
        let username = Username::new(&"あ".repeat(40));
        assert_eq!(
            username.as_str().chars().count(),
            constants::MAX_USER_INPUT_LENGTH / 2
        );
    }

    #[test]
    fn card_display() {
        assert_eq!(Card(1, Suit::Spade).to_string().trim(), "A/♠");
        assert_eq!(Card(13, Suit::Heart).to_string().trim(), "K/♥");
        assert_eq!(Card(7, Suit::Club).to_string().trim(), "7/♣");
    }
}
