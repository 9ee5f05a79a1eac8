//! Navigation error types
//!
//! None of these are fatal. Public navigator operations log them and report
//! "nothing happened" through their return values; only restoration I/O
//! returns them to the caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Destination type not registered in scene {scene}: {type_key}")]
    UnregisteredDestination { scene: String, type_key: String },

    #[error("No popover source available for {0}")]
    MissingPopoverSource(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Scene has no navigation stack: {0}")]
    NoNavigationStack(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Scene already exists: {0}")]
    DuplicateScene(String),

    #[error("Root scene cannot be dismissed")]
    RootNotDismissible,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] waypoint_storage::StorageError),
}

impl NavigationError {
    /// Configuration errors point at a wiring mistake in the application and
    /// are logged as warnings; everything else is a routine resolution miss.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            NavigationError::UnregisteredDestination { .. }
                | NavigationError::MissingPopoverSource(_)
                | NavigationError::NoNavigationStack(_)
        )
    }
}
