//! HTTP/WebSocket API for the blackjack server.
//!
//! # Architecture
//!
//! - **Axum**: Async web framework for HTTP/WebSocket
//! - **Tower**: Middleware for CORS
//! - **Actor Model**: Table state managed by dedicated actor tasks
//!
//! # Modules
//!
//! - [`rooms`]: Room management (create, list, start a round)
//! - [`websocket`]: Real-time bidirectional communication for live game updates
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                          - Health check
//! GET  /api/v1/rooms                    - List rooms
//! POST /api/v1/rooms                    - Create room
//! POST /api/v1/rooms/{room_id}/start    - Start betting / deal the round
//! GET  /ws/{room_id}?player_id=<id>     - WebSocket connection
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively for development. In production, configure
//! appropriate origins, methods, and headers.

pub mod rooms;
pub mod websocket;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use blackjack::TableRegistry;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;

/// Capacity of the server-wide chat channel.
const GLOBAL_CHAT_CAPACITY: usize = 64;

/// A chat line addressed to every connected client, regardless of room.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GlobalChatMessage {
    pub username: String,
    pub text: String,
}

/// Application state shared across all HTTP handlers and WebSocket
/// connections. Cloned per request; cheap due to the Arc and the
/// broadcast handle.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<TableRegistry>,
    pub chat: broadcast::Sender<GlobalChatMessage>,
}

impl AppState {
    pub fn new(registry: Arc<TableRegistry>) -> Self {
        let (chat, _) = broadcast::channel(GLOBAL_CHAT_CAPACITY);
        Self { registry, chat }
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route("/rooms/{room_id}/start", post(rooms::start_room));

    let root_routes = Router::new()
        .route("/health", get(health_check))
        .route("/ws/{room_id}", get(websocket::websocket_handler));

    Router::new()
        .merge(root_routes)
        .nest("/api/v1", v1_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3000/health
/// # {"status":"healthy","rooms":1,"timestamp":"2026-08-24T10:30:00+00:00"}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let room_count = state.registry.table_count().await;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "rooms": room_count,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(response))
}
