//! Blackjack game engine - canonical state and rules.
//!
//! This module provides the core game implementation:
//! - Card/deck primitives and seated player entities
//! - The single hand evaluator (ace-flexible totals)
//! - The per-table phase machine (lobby, betting, turns, dealer, settle)
//! - Per-viewer snapshot projection with hole-card masking

pub mod constants;
pub mod entities;
pub mod evaluator;
pub mod projector;
pub mod state;

pub use evaluator::{hand_value, is_blackjack, is_bust};
pub use projector::{CardView, DealerView, SeatView, TableSnapshot, project};
pub use state::{BlackjackGame, GameError, GameSettings, Phase, TableId};
