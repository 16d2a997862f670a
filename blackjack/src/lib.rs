//! # Blackjack
//!
//! A multiplayer blackjack table engine.
//!
//! One [`game::BlackjackGame`] per table is the single source of truth for
//! cards, turns, bets, and outcomes. Tables run as independent actors
//! behind a [`table::TableRegistry`]; after every accepted mutation the
//! table pushes one masked, per-viewer snapshot to each subscriber, so
//! clients stay stateless between messages.
//!
//! ## Core Modules
//!
//! - [`game`]: cards, the hand evaluator, the phase machine, and the
//!   per-viewer visibility projector
//! - [`table`]: actor, registry, and the actor message protocol
//!
//! ## Example
//!
//! ```
//! use blackjack::game::{BlackjackGame, GameSettings};
//! use uuid::Uuid;
//!
//! // A fresh table in the lobby phase.
//! let game = BlackjackGame::new(Uuid::new_v4(), GameSettings::default());
//! assert!(game.players().is_empty());
//! ```

pub mod game;
pub use game::{
    BlackjackGame, GameError, GameSettings, Phase, TableId, TableSnapshot,
    constants::{self, DEFAULT_STARTING_CHIPS, MAX_PLAYERS},
    entities, evaluator, projector,
};

pub mod table;
pub use table::{TableEvent, TableHandle, TableMessage, TableRegistry};
