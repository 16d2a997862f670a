//! The one and only hand evaluator.
//!
//! Every total in the codebase comes from [`hand_value`]. Settlement, the
//! dealer's draw loop, and the per-viewer projector all call into here, so
//! there is exactly one place where ace flexibility lives.

use super::constants::BLACKJACK_TOTAL;
use super::entities::Card;

/// Blackjack total of a hand.
///
/// Jacks, queens, and kings count 10; numeral cards count face value; each
/// ace counts 11 until the total would bust, then flips to 1. An empty
/// hand totals 0. Pure and order-invariant.
#[must_use]
pub fn hand_value(hand: &[Card]) -> u16 {
    let mut total: u16 = 0;
    let mut flexible_aces: u16 = 0;
    for card in hand {
        total += match card.0 {
            1 => {
                flexible_aces += 1;
                11
            }
            11..=13 => 10,
            v => u16::from(v),
        };
    }
    while total > BLACKJACK_TOTAL && flexible_aces > 0 {
        total -= 10;
        flexible_aces -= 1;
    }
    total
}

#[must_use]
pub fn is_bust(hand: &[Card]) -> bool {
    hand_value(hand) > BLACKJACK_TOTAL
}

/// A natural: exactly two cards totalling 21.
#[must_use]
pub fn is_blackjack(hand: &[Card]) -> bool {
    hand.len() == 2 && hand_value(hand) == BLACKJACK_TOTAL
}
