//! HTTP/WebSocket front end for the blackjack table engine.
//!
//! The binary in `main.rs` wires configuration, logging, and the room
//! registry together; everything reachable over the network lives in
//! [`api`].

pub mod api;
pub mod config;
pub mod logging;
