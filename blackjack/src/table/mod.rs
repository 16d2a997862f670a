//! Table module providing multi-table support with an async actor model.
//!
//! Each table runs in its own tokio task with an mpsc message inbox, so a
//! table's state is only ever mutated by one actor while different tables
//! run fully in parallel. The [`TableRegistry`] spawns actors, resolves
//! table ids, and coordinates join/leave and teardown.

pub mod actor;
pub mod messages;
pub mod registry;

pub use actor::{TableActor, TableHandle, subscriber_channel};
pub use messages::{LeaveOutcome, TableEvent, TableMessage, TableSummary};
pub use registry::TableRegistry;
