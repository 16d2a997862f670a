//! Table registry for spawning and looking up table actors.
//!
//! The registry is the single owned map from table ids to live actors.
//! It is passed explicitly to whatever boundary needs it; there is no
//! ambient global table state.

use std::collections::HashMap;

use log::info;
use tokio::sync::{RwLock, oneshot};
use uuid::Uuid;

use super::actor::{TableActor, TableHandle};
use super::messages::{TableMessage, TableSummary};
use crate::game::entities::{PlayerId, Username};
use crate::game::{GameError, GameSettings, TableId};

/// Registry of active tables. Lookups are concurrency-safe; per-table
/// mutations are serialized by each table's own actor, so actions on
/// different tables proceed fully in parallel.
pub struct TableRegistry {
    settings: GameSettings,
    tables: RwLock<HashMap<TableId, TableHandle>>,
}

impl TableRegistry {
    #[must_use]
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a table with a fresh collision-resistant id and spawns its
    /// actor task.
    pub async fn create_table(&self) -> TableId {
        let table_id = Uuid::new_v4();
        let (actor, handle) = TableActor::new(table_id, self.settings);

        let mut tables = self.tables.write().await;
        tables.insert(table_id, handle);
        drop(tables);

        tokio::spawn(actor.run());

        info!("created and spawned table {table_id}");
        table_id
    }

    pub async fn get_table(&self, table_id: TableId) -> Option<TableHandle> {
        let tables = self.tables.read().await;
        tables.get(&table_id).cloned()
    }

    /// Seats a player at a table. Idempotent per `(table_id, player_id)`.
    pub async fn join_table(
        &self,
        table_id: TableId,
        player_id: PlayerId,
        username: Username,
    ) -> Result<bool, GameError> {
        let handle = self
            .get_table(table_id)
            .await
            .ok_or(GameError::RoomNotFound)?;

        let (tx, rx) = oneshot::channel();
        if handle
            .send(TableMessage::Join {
                player_id,
                username,
                response: tx,
            })
            .await
            .is_err()
        {
            // The actor is gone; reap the stale handle.
            self.remove_table(table_id).await;
            return Err(GameError::RoomNotFound);
        }

        rx.await.map_err(|_| GameError::RoomNotFound)?
    }

    /// Removes a player's seat. Leaving the last player closes the table,
    /// which stops it from receiving or emitting anything further.
    pub async fn leave_table(
        &self,
        table_id: TableId,
        player_id: PlayerId,
    ) -> Result<(), GameError> {
        let handle = self
            .get_table(table_id)
            .await
            .ok_or(GameError::RoomNotFound)?;

        let (tx, rx) = oneshot::channel();
        handle
            .send(TableMessage::Leave {
                player_id,
                response: tx,
            })
            .await?;
        let outcome = rx.await.map_err(|_| GameError::RoomNotFound)??;

        if outcome.table_empty {
            info!("table {table_id} emptied, closing");
            self.close_table(table_id).await;
        }
        Ok(())
    }

    /// Stops a table's actor and drops its handle.
    pub async fn close_table(&self, table_id: TableId) {
        let handle = self.remove_table(table_id).await;
        if let Some(handle) = handle {
            let (tx, rx) = oneshot::channel();
            if handle
                .send(TableMessage::Close { response: tx })
                .await
                .is_ok()
            {
                let _ = rx.await;
            }
        }
    }

    /// Summaries of all live tables, for discovery. Tables whose actors
    /// died (internal corruption) are reaped along the way.
    pub async fn list_tables(&self) -> Vec<TableSummary> {
        let handles: Vec<TableHandle> = {
            let tables = self.tables.read().await;
            tables.values().cloned().collect()
        };

        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let (tx, rx) = oneshot::channel();
            if handle
                .send(TableMessage::Describe { response: tx })
                .await
                .is_err()
            {
                self.remove_table(handle.table_id()).await;
                continue;
            }
            match rx.await {
                Ok(summary) => summaries.push(summary),
                Err(_) => {
                    self.remove_table(handle.table_id()).await;
                }
            }
        }
        summaries
    }

    pub async fn table_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables.len()
    }

    async fn remove_table(&self, table_id: TableId) -> Option<TableHandle> {
        let mut tables = self.tables.write().await;
        tables.remove(&table_id)
    }
}
