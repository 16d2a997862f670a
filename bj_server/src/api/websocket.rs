//! WebSocket handler for real-time room updates.
//!
//! This module implements the bidirectional WebSocket connection for live
//! blackjack play. A connection is scoped to one room; once established,
//! the client receives a fresh masked snapshot after every accepted
//! mutation at the table and can send commands to act in the game.
//!
//! # Connection Flow
//!
//! 1. Client connects via `GET /ws/:room_id?player_id=<id>&username=<name>`
//! 2. Server subscribes the connection to the room's event stream
//! 3. Server spawns a send task forwarding snapshots, bet events, and chat
//! 4. Incoming commands are relayed to the room's actor
//! 5. On disconnect, the player's seat is released
//!
//! # Client Messages
//!
//! ```json
//! {"type": "join", "username": "alice"}
//! {"type": "start"}
//! {"type": "place_bet", "amount": 100}
//! {"type": "hit"}
//! {"type": "stay"}
//! {"type": "next_round"}
//! {"type": "chat", "text": "gl", "global": false}
//! {"type": "leave"}
//! ```
//!
//! # Server Messages
//!
//! Every accepted action at the table produces a `game_state` message
//! holding this viewer's complete snapshot; clients replace their local
//! state with it wholesale. Rejected commands produce an `error` message
//! on the offending connection only.

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};
use uuid::Uuid;

use blackjack::game::entities::{Chips, PlayerId, Username};
use blackjack::table::{TableEvent, TableHandle, TableMessage, subscriber_channel};
use blackjack::{GameError, TableId, TableSnapshot};

use super::{AppState, GlobalChatMessage};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    player_id: String,
    username: Option<String>,
}

/// Client messages received via WebSocket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    /// Take (or refresh) a seat in the room
    Join { username: Option<String> },
    /// Give up the seat
    Leave,
    /// Open betting, or force-deal if betting is already open
    Start,
    /// Lock a bet for the round
    PlaceBet { amount: Chips },
    /// Draw a card
    Hit,
    /// End the turn
    Stay,
    /// Clear a settled round and return the room to the lobby
    NextRound,
    /// Send a chat line to the room, or to every connected client
    Chat {
        text: String,
        #[serde(default)]
        global: bool,
    },
}

/// Messages sent to the client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerMessage {
    JoinedRoom {
        room_id: TableId,
        player_id: String,
    },
    RoomNotFound {
        room_id: TableId,
    },
    GameState {
        state: TableSnapshot,
    },
    BetPlaced {
        player_id: String,
        amount: Chips,
    },
    ChatMessage {
        username: String,
        text: String,
        global: bool,
        timestamp: String,
    },
    RoomClosed {
        room_id: TableId,
    },
    Error {
        message: String,
    },
}

/// Upgrade HTTP connection to WebSocket for real-time room communication.
///
/// # Path Parameters
///
/// - `room_id`: Room to connect to
///
/// # Query Parameters
///
/// - `player_id`: Stable client-chosen identifier; reconnecting with the
///   same id resumes the same seat
/// - `username`: Optional display name
///
/// Connecting to an unknown room still upgrades; the client receives a
/// `room_not_found` message and the connection closes.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(room_id): Path<Uuid>,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, room_id, query, state))
}

/// Handle an established WebSocket connection.
///
/// Spawns a send task that forwards room events and global chat to the
/// client, then processes incoming commands until the socket closes. On
/// disconnect the subscription is dropped and the seat is released.
async fn handle_socket(socket: WebSocket, room_id: Uuid, query: WsQuery, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let player_id = PlayerId::new(query.player_id.clone());

    info!("WebSocket connected: room={room_id}, player={player_id}");

    let Some(handle) = state.registry.get_table(room_id).await else {
        warn!("room {room_id} not found for {player_id}");
        let _ = send_message(&mut sender, &ServerMessage::RoomNotFound { room_id }).await;
        let _ = sender.send(Message::Close(None)).await;
        return;
    };

    // Subscribe to the room's event stream before any command can be
    // accepted, so no snapshot is missed.
    let (event_tx, mut event_rx) = subscriber_channel();
    if handle
        .send(TableMessage::Subscribe {
            player_id: player_id.clone(),
            sender: event_tx,
        })
        .await
        .is_err()
    {
        let _ = send_message(&mut sender, &ServerMessage::RoomNotFound { room_id }).await;
        return;
    }

    let mut chat_rx = state.chat.subscribe();

    // Channel for direct responses from the command handler.
    let (response_tx, mut response_rx) = mpsc::channel::<ServerMessage>(32);

    // Send task: forwards direct responses, room events, and global chat.
    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                maybe_response = response_rx.recv() => {
                    let Some(message) = maybe_response else { break };
                    if send_message(&mut sender, &message).await.is_err() {
                        break;
                    }
                }
                maybe_event = event_rx.recv() => {
                    let Some(event) = maybe_event else { break };
                    let closing = matches!(event, TableEvent::Closed);
                    let message = room_event_message(room_id, event);
                    if send_message(&mut sender, &message).await.is_err() {
                        break;
                    }
                    if closing {
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                }
                chat = chat_rx.recv() => {
                    match chat {
                        Ok(chat) => {
                            let message = ServerMessage::ChatMessage {
                                username: chat.username,
                                text: chat.text,
                                global: true,
                                timestamp: chrono::Utc::now().to_rfc3339(),
                            };
                            if send_message(&mut sender, &message).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("global chat lagged, skipped {skipped} messages");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
        }
    });

    let mut joined = false;
    let mut username = Username::new(query.username.as_deref().unwrap_or(&query.player_id));

    while let Some(Ok(message)) = receiver.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_message) => {
                    handle_client_message(
                        client_message,
                        &state,
                        &handle,
                        room_id,
                        &player_id,
                        &mut username,
                        &mut joined,
                        &response_tx,
                    )
                    .await;
                }
                Err(e) => {
                    let _ = response_tx
                        .send(ServerMessage::Error {
                            message: format!("malformed message: {e}"),
                        })
                        .await;
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Cleanup: drop the subscription, then release the seat.
    let _ = handle
        .send(TableMessage::Unsubscribe {
            player_id: player_id.clone(),
        })
        .await;

    if joined {
        if let Err(e) = state.registry.leave_table(room_id, player_id.clone()).await {
            debug!("seat release after disconnect: {e}");
        }
    }

    send_task.abort();
    info!("WebSocket disconnected: room={room_id}, player={player_id}");
}

/// Relays one client command to the room's actor.
///
/// Successful mutations are acknowledged by the snapshot broadcast;
/// rejections surface as an `error` message on this connection only.
#[allow(clippy::too_many_arguments)]
async fn handle_client_message(
    message: ClientMessage,
    state: &AppState,
    handle: &TableHandle,
    room_id: TableId,
    player_id: &PlayerId,
    username: &mut Username,
    joined: &mut bool,
    response_tx: &mpsc::Sender<ServerMessage>,
) {
    match message {
        ClientMessage::Join {
            username: requested,
        } => {
            if let Some(name) = requested {
                *username = Username::new(&name);
            }
            let (tx, rx) = oneshot::channel();
            let result = request(
                handle,
                TableMessage::Join {
                    player_id: player_id.clone(),
                    username: username.clone(),
                    response: tx,
                },
                rx,
            )
            .await;
            match result {
                Ok(_) => {
                    *joined = true;
                    let _ = response_tx
                        .send(ServerMessage::JoinedRoom {
                            room_id,
                            player_id: player_id.to_string(),
                        })
                        .await;
                }
                Err(e) => send_error(response_tx, &e).await,
            }
        }

        ClientMessage::Leave => {
            match state.registry.leave_table(room_id, player_id.clone()).await {
                Ok(()) => *joined = false,
                Err(e) => send_error(response_tx, &e).await,
            }
        }

        ClientMessage::Start => {
            let (tx, rx) = oneshot::channel();
            let result = request(
                handle,
                TableMessage::Start {
                    player_id: player_id.clone(),
                    response: tx,
                },
                rx,
            )
            .await;
            if let Err(e) = result {
                send_error(response_tx, &e).await;
            }
        }

        ClientMessage::PlaceBet { amount } => {
            let (tx, rx) = oneshot::channel();
            let result = request(
                handle,
                TableMessage::PlaceBet {
                    player_id: player_id.clone(),
                    amount,
                    response: tx,
                },
                rx,
            )
            .await;
            if let Err(e) = result {
                send_error(response_tx, &e).await;
            }
        }

        ClientMessage::Hit => {
            let (tx, rx) = oneshot::channel();
            let result = request(
                handle,
                TableMessage::Hit {
                    player_id: player_id.clone(),
                    response: tx,
                },
                rx,
            )
            .await;
            if let Err(e) = result {
                send_error(response_tx, &e).await;
            }
        }

        ClientMessage::Stay => {
            let (tx, rx) = oneshot::channel();
            let result = request(
                handle,
                TableMessage::Stay {
                    player_id: player_id.clone(),
                    response: tx,
                },
                rx,
            )
            .await;
            if let Err(e) = result {
                send_error(response_tx, &e).await;
            }
        }

        ClientMessage::NextRound => {
            let (tx, rx) = oneshot::channel();
            let result = request(
                handle,
                TableMessage::ResetRound {
                    player_id: player_id.clone(),
                    response: tx,
                },
                rx,
            )
            .await;
            if let Err(e) = result {
                send_error(response_tx, &e).await;
            }
        }

        ClientMessage::Chat { text, global } => {
            if global {
                let _ = state.chat.send(GlobalChatMessage {
                    username: username.to_string(),
                    text,
                });
            } else {
                let (tx, rx) = oneshot::channel();
                let result = request(
                    handle,
                    TableMessage::Chat {
                        player_id: player_id.clone(),
                        text,
                        response: tx,
                    },
                    rx,
                )
                .await;
                if let Err(e) = result {
                    send_error(response_tx, &e).await;
                }
            }
        }
    }
}

/// Sends a request to the actor and waits for its reply. A dropped reply
/// channel means the room was torn down mid-request.
async fn request<T>(
    handle: &TableHandle,
    message: TableMessage,
    rx: oneshot::Receiver<Result<T, GameError>>,
) -> Result<T, GameError> {
    handle.send(message).await?;
    rx.await.map_err(|_| GameError::RoomNotFound)?
}

async fn send_error(response_tx: &mpsc::Sender<ServerMessage>, err: &GameError) {
    let _ = response_tx
        .send(ServerMessage::Error {
            message: err.to_string(),
        })
        .await;
}

fn room_event_message(room_id: TableId, event: TableEvent) -> ServerMessage {
    match event {
        TableEvent::State(state) => ServerMessage::GameState { state },
        TableEvent::BetPlaced { player_id, amount } => ServerMessage::BetPlaced {
            player_id: player_id.to_string(),
            amount,
        },
        TableEvent::Chat { username, text } => ServerMessage::ChatMessage {
            username: username.to_string(),
            text,
            global: false,
            timestamp: chrono::Utc::now().to_rfc3339(),
        },
        TableEvent::Closed => ServerMessage::RoomClosed { room_id },
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    match serde_json::to_string(message) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            error!("failed to serialize server message: {e}");
            Ok(())
        }
    }
}
