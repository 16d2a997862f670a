//! Table actor implementation with async message handling.
//!
//! Each table runs as one tokio task owning its [`BlackjackGame`]. All
//! mutations flow through the actor's inbox and apply strictly serially,
//! so every accepted action is applied at most once and every subscriber
//! observes the same total order of snapshots.

use std::collections::HashMap;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;

use super::messages::{LeaveOutcome, TableEvent, TableMessage, TableSummary};
use crate::game::entities::PlayerId;
use crate::game::{BlackjackGame, GameError, GameSettings, TableId, project};

const INBOX_CAPACITY: usize = 100;
const SUBSCRIBER_CAPACITY: usize = 32;

/// Cloneable handle for sending messages to a table actor.
#[derive(Clone, Debug)]
pub struct TableHandle {
    sender: mpsc::Sender<TableMessage>,
    table_id: TableId,
}

impl TableHandle {
    pub fn new(sender: mpsc::Sender<TableMessage>, table_id: TableId) -> Self {
        Self { sender, table_id }
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Sends a message to the table. A closed inbox means the table was
    /// torn down, which callers see as the room no longer existing.
    pub async fn send(&self, message: TableMessage) -> Result<(), GameError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| GameError::RoomNotFound)
    }
}

/// Actor owning a single blackjack table.
pub struct TableActor {
    game: BlackjackGame,
    inbox: mpsc::Receiver<TableMessage>,
    /// Connected viewers; every accepted mutation pushes one fresh
    /// snapshot per entry.
    subscribers: HashMap<PlayerId, mpsc::Sender<TableEvent>>,
    is_closed: bool,
}

impl TableActor {
    pub fn new(table_id: TableId, settings: GameSettings) -> (Self, TableHandle) {
        let (sender, inbox) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            game: BlackjackGame::new(table_id, settings),
            inbox,
            subscribers: HashMap::new(),
            is_closed: false,
        };
        let handle = TableHandle::new(sender, table_id);
        (actor, handle)
    }

    /// Runs the actor event loop until the table closes.
    pub async fn run(mut self) {
        let table_id = self.game.table_id();
        info!("table {table_id} starting");

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.is_closed {
                break;
            }
        }

        self.broadcast_event(TableEvent::Closed);
        info!("table {table_id} closed");
    }

    fn handle_message(&mut self, message: TableMessage) {
        match message {
            TableMessage::Join {
                player_id,
                username,
                response,
            } => {
                let result = self.game.join(player_id, username);
                self.after_mutation(&result);
                let _ = response.send(result);
            }

            TableMessage::Leave {
                player_id,
                response,
            } => {
                let result = self.game.leave(&player_id).map(|()| LeaveOutcome {
                    table_empty: self.game.active_player_count() == 0,
                });
                self.after_mutation(&result);
                let _ = response.send(result);
            }

            TableMessage::Start {
                player_id,
                response,
            } => {
                let result = self.game.start(&player_id);
                self.after_mutation(&result);
                let _ = response.send(result);
            }

            TableMessage::PlaceBet {
                player_id,
                amount,
                response,
            } => {
                let result = self.game.place_bet(&player_id, amount);
                self.after_mutation(&result);
                if result.is_ok() {
                    self.broadcast_event(TableEvent::BetPlaced {
                        player_id: player_id.clone(),
                        amount,
                    });
                }
                let _ = response.send(result);
            }

            TableMessage::Hit {
                player_id,
                response,
            } => {
                let result = self.game.hit(&player_id);
                self.after_mutation(&result);
                let _ = response.send(result);
            }

            TableMessage::Stay {
                player_id,
                response,
            } => {
                let result = self.game.stay(&player_id);
                self.after_mutation(&result);
                let _ = response.send(result);
            }

            TableMessage::ResetRound {
                player_id,
                response,
            } => {
                let result = self.game.reset(&player_id);
                self.after_mutation(&result);
                let _ = response.send(result);
            }

            TableMessage::Chat {
                player_id,
                text,
                response,
            } => {
                // Chat relays only; it never changes game state.
                let username = self
                    .game
                    .players()
                    .iter()
                    .find(|p| p.id == player_id)
                    .map(|p| p.username.clone());
                let result = match username {
                    Some(username) => {
                        self.broadcast_event(TableEvent::Chat { username, text });
                        Ok(())
                    }
                    None => Err(GameError::PlayerNotFound),
                };
                let _ = response.send(result);
            }

            TableMessage::GetSnapshot {
                player_id,
                response,
            } => {
                let _ = response.send(project(&self.game, &player_id));
            }

            TableMessage::Describe { response } => {
                let _ = response.send(TableSummary {
                    table_id: self.game.table_id(),
                    player_count: self.game.players().len(),
                    phase: self.game.phase(),
                });
            }

            TableMessage::Subscribe { player_id, sender } => {
                debug!("{player_id} subscribed to table {}", self.game.table_id());
                self.subscribers.insert(player_id, sender);
            }

            TableMessage::Unsubscribe { player_id } => {
                debug!(
                    "{player_id} unsubscribed from table {}",
                    self.game.table_id()
                );
                self.subscribers.remove(&player_id);
            }

            TableMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(());
            }
        }
    }

    /// Broadcasts fresh snapshots on success; closes the table on an
    /// internal invariant violation. Plain rejections broadcast nothing.
    fn after_mutation<T>(&mut self, result: &Result<T, GameError>) {
        match result {
            Ok(_) => self.broadcast_state(),
            Err(e) if e.is_internal() => {
                error!(
                    "table {} corrupted ({e}), tearing down",
                    self.game.table_id()
                );
                self.is_closed = true;
            }
            Err(_) => {}
        }
    }

    /// One projected snapshot per subscriber. `try_send` so a slow or
    /// disconnected viewer never blocks the mutation path.
    fn broadcast_state(&mut self) {
        let game = &self.game;
        self.subscribers.retain(|player_id, sender| {
            let snapshot = project(game, player_id);
            match sender.try_send(TableEvent::State(snapshot)) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("subscriber {player_id} channel full, dropping snapshot");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("subscriber {player_id} disconnected, removing");
                    false
                }
            }
        });
    }

    fn broadcast_event(&mut self, event: TableEvent) {
        self.subscribers.retain(|player_id, sender| {
            match sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("subscriber {player_id} channel full, dropping event");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }
}

/// Default capacity for subscriber channels created by gateways.
#[must_use]
pub fn subscriber_channel() -> (mpsc::Sender<TableEvent>, mpsc::Receiver<TableEvent>) {
    mpsc::channel(SUBSCRIBER_CAPACITY)
}
