/// Property-based tests for blackjack hand evaluation using proptest
///
/// These tests verify that hand totals, bust detection, and blackjack
/// detection hold across a wide range of randomly generated hands.
use blackjack::evaluator::{hand_value, is_blackjack, is_bust};
use blackjack::game::entities::{Card, Suit};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Strategy to generate a valid card (values 1-13, aces are value 1)
fn card_strategy() -> impl Strategy<Value = Card> {
    (1u8..=13, 0u8..=3).prop_map(|(value, suit_idx)| {
        let suit = match suit_idx {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            _ => Suit::Spade,
        };
        Card(value, suit)
    })
}

// Strategy to generate a vec of unique cards (no duplicates)
fn unique_cards_strategy(min: usize, max: usize) -> impl Strategy<Value = Vec<Card>> {
    prop::collection::vec(card_strategy(), min..=max).prop_filter("Cards must be unique", |cards| {
        let set: BTreeSet<_> = cards.iter().collect();
        set.len() == cards.len()
    })
}

// Total with every ace counted low: the floor of all possible readings.
fn hard_total(cards: &[Card]) -> u16 {
    cards
        .iter()
        .map(|card| match card.0 {
            11..=13 => 10u16,
            v => u16::from(v),
        })
        .sum()
}

proptest! {
    #[test]
    fn value_is_deterministic(cards in unique_cards_strategy(1, 11)) {
        prop_assert_eq!(hand_value(&cards), hand_value(&cards));
    }

    #[test]
    fn value_is_order_invariant(cards in unique_cards_strategy(2, 11)) {
        let expected = hand_value(&cards);
        let mut reversed = cards.clone();
        reversed.reverse();
        prop_assert_eq!(hand_value(&reversed), expected, "reversal changed total");

        let mut rotated = cards.clone();
        rotated.rotate_left(1);
        prop_assert_eq!(hand_value(&rotated), expected, "rotation changed total");
    }

    /// The total is the hard total (all aces low) plus at most one
    /// ten-point ace promotion, and never a promotion past 21.
    #[test]
    fn value_is_hard_total_or_one_soft_ace(cards in unique_cards_strategy(1, 11)) {
        let value = hand_value(&cards);
        let hard = hard_total(&cards);
        let has_ace = cards.iter().any(|card| card.0 == 1);

        if has_ace && hard + 10 <= 21 {
            prop_assert_eq!(value, hard + 10, "soft ace should be used when safe");
        } else {
            prop_assert_eq!(value, hard, "no safe soft reading, total must be hard");
        }
    }

    /// A bust total is never an artifact of counting an ace high: any
    /// hand over 21 is over 21 under every reading.
    #[test]
    fn bust_is_never_caused_by_a_soft_ace(cards in unique_cards_strategy(1, 11)) {
        let value = hand_value(&cards);
        if value > 21 {
            prop_assert_eq!(value, hard_total(&cards));
            prop_assert!(is_bust(&cards));
        } else {
            prop_assert!(!is_bust(&cards));
        }
    }

    #[test]
    fn value_is_bounded_by_card_count(cards in unique_cards_strategy(1, 11)) {
        let value = hand_value(&cards);
        let n = cards.len() as u16;
        prop_assert!(value >= n, "every card is worth at least 1");
        prop_assert!(value <= 11 * n, "no card is worth more than 11");
    }

    #[test]
    fn blackjack_requires_two_cards_totalling_21(cards in unique_cards_strategy(1, 11)) {
        if is_blackjack(&cards) {
            prop_assert_eq!(cards.len(), 2);
            prop_assert_eq!(hand_value(&cards), 21);
        }
        if cards.len() == 2 && hand_value(&cards) == 21 {
            prop_assert!(is_blackjack(&cards));
        }
    }
}

#[test]
fn empty_hand_is_zero() {
    assert_eq!(hand_value(&[]), 0);
    assert!(!is_bust(&[]));
    assert!(!is_blackjack(&[]));
}
