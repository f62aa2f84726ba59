//! Database dump, restore and local/remote synchronization.
//!
//! The pieces compose bottom-up:
//! - [`value`] renders column values as MySQL literals.
//! - [`rewrite`] swaps base URLs inside JSON content.
//! - [`schema`] reflects tables, columns, keys and DDL from a live server.
//! - [`dump`] turns a database into one SQL script held in memory.
//! - [`splitter`] and [`executor`] replay a script statement by statement.
//! - [`backup`] snapshots a database to disk before it is overwritten.
//! - [`connection`] loads remote credentials and explains connect failures.
//! - [`orchestrator`] runs pull/push syncs and reports through [`progress`].

pub mod backup;
pub mod connection;
pub mod dump;
pub mod error;
pub mod executor;
pub mod lock;
pub mod options;
pub mod orchestrator;
pub mod progress;
pub mod rewrite;
pub mod schema;
pub mod splitter;
pub mod value;

pub use error::{SyncError, SyncResult};
