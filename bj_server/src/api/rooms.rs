//! Room management API handlers.
//!
//! REST endpoints for creating rooms, listing them, and kicking off a
//! round. Everything that happens inside a round flows over the
//! WebSocket instead.
//!
//! # Examples
//!
//! Create a room:
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/rooms
//! ```
//!
//! Start a round:
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/rooms/<room_id>/start \
//!   -H "Content-Type: application/json" \
//!   -d '{"player_id": "p1"}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use blackjack::game::entities::PlayerId;
use blackjack::table::{TableMessage, TableSummary};
use blackjack::{GameError, TableId};
use tokio::sync::oneshot;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: TableId,
}

#[derive(Debug, Deserialize)]
pub struct StartRoomRequest {
    pub player_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps a game rejection to the HTTP status it should surface as.
fn error_status(err: &GameError) -> StatusCode {
    match err {
        GameError::RoomNotFound | GameError::PlayerNotFound => StatusCode::NOT_FOUND,
        GameError::InvalidBet => StatusCode::BAD_REQUEST,
        GameError::DeckExhausted => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::CONFLICT,
    }
}

fn error_response(err: &GameError) -> (StatusCode, Json<ErrorResponse>) {
    (
        error_status(err),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

/// Create a new room.
///
/// Returns `201 Created` with the room id. The room starts empty, in the
/// lobby phase; players join over the WebSocket.
pub async fn create_room(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateRoomResponse>) {
    let room_id = state.registry.create_table().await;
    (StatusCode::CREATED, Json(CreateRoomResponse { room_id }))
}

/// List all active rooms.
///
/// Returns `200 OK` with an array of room summaries:
/// ```json
/// [{"table_id": "...", "player_count": 2, "phase": "betting"}]
/// ```
pub async fn list_rooms(State(state): State<AppState>) -> Json<Vec<TableSummary>> {
    Json(state.registry.list_tables().await)
}

/// Start a round in a room.
///
/// From the lobby this opens betting (or deals immediately if the table
/// is below the betting threshold); during betting it force-closes the
/// betting window and deals.
///
/// # Errors
///
/// - `404 Not Found`: Room doesn't exist or the caller isn't seated
/// - `409 Conflict`: The round is already under way
pub async fn start_room(
    State(state): State<AppState>,
    Path(room_id): Path<Uuid>,
    Json(request): Json<StartRoomRequest>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let handle = state
        .registry
        .get_table(room_id)
        .await
        .ok_or_else(|| error_response(&GameError::RoomNotFound))?;

    let (tx, rx) = oneshot::channel();
    handle
        .send(TableMessage::Start {
            player_id: PlayerId::new(request.player_id),
            response: tx,
        })
        .await
        .map_err(|e| error_response(&e))?;

    match rx.await {
        Ok(Ok(())) => Ok(StatusCode::OK),
        Ok(Err(e)) => Err(error_response(&e)),
        Err(_) => Err(error_response(&GameError::RoomNotFound)),
    }
}
