//! Waypoint Storage Layer
//!
//! SQLite-backed persistence for navigation snapshots and settings.
//! Snapshots are stored as opaque JSON documents keyed by restoration key, so
//! this crate knows nothing about destinations or scenes.

mod database;
mod error;
mod migrations;
mod snapshots;

pub use database::Database;
pub use error::StorageError;
pub use snapshots::{SnapshotStore, StoredSnapshot};

pub type Result<T> = std::result::Result<T, StorageError>;
