//! Multi-room blackjack server using async actor model.
//!
//! The server spawns one actor task per room, all managed by a shared
//! registry, and exposes REST endpoints for room management plus a
//! WebSocket per connection for live play.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use blackjack::TableRegistry;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;

use bj_server::api;
use bj_server::config::ServerConfig;
use bj_server::logging;

const HELP: &str = "\
Run a multi-room blackjack server

USAGE:
  bj_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:3000]
  --rooms      N           Number of rooms to create   [default: env NUM_ROOMS or 0]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  NUM_ROOMS                Rooms created on startup
  TABLE_STARTING_CHIPS     Chip balance granted to each new player
  TABLE_MAX_PLAYERS        Seats per room
  TABLE_MIN_PLAYERS_TO_BET Seated players required for a betting phase
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let num_rooms_override: Option<usize> = pargs.opt_value_from_str("--rooms")?;

    let config = ServerConfig::from_env(bind_override, num_rooms_override)?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();
    info!("Starting multi-room blackjack server at {}", config.bind);

    let registry = Arc::new(TableRegistry::new(config.game));

    if config.num_rooms > 0 {
        info!("Creating {} initial room(s)...", config.num_rooms);
        for _ in 0..config.num_rooms {
            let room_id = registry.create_table().await;
            info!("Created room {room_id}");
        }
    }

    let room_count = registry.table_count().await;
    info!("Server ready with {room_count} active room(s)");

    let state = api::AppState::new(registry);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
