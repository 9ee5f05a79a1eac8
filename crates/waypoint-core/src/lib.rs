//! Waypoint Core
//!
//! Declarative navigation coordination: typed destinations resolved to a
//! presentation method, per-scene stacks and presentations kept in an arena
//! of coordinators, sequenced action sending, checkpoints and popover anchors.
//! Rendering is left to the application, which observes scene state and the
//! event stream.

mod action;
mod checkpoint;
mod config;
mod coordinator;
mod destination;
mod error;
mod event;
mod method;
mod navigator;
mod popover;
mod queue;
mod restore;
mod state;
mod tree;

pub use action::{NavigationAction, PopCount};
pub use checkpoint::{CheckpointOutcome, CheckpointRegistration, CheckpointValue, NavigationCheckpoint};
pub use config::NavigationConfig;
pub use coordinator::{SceneId, SceneKind};
pub use destination::{
    AnyDestination, Body, DestinationId, EncodedDestination, NavigationDestination,
    ReceiveResumeType,
};
pub use error::NavigationError;
pub use event::NavigationEvent;
pub use method::NavigationMethod;
pub use navigator::{Navigator, PresentedItem};
pub use popover::{
    Edge, PopoverAnchor, PopoverBinding, PopoverRegistration, PopoverSource,
    PopoverSourceRegistry, RegisteredPopoverSource, UnitPoint,
};
pub use queue::QueueStatus;
pub use restore::{NavigationSnapshot, SceneSnapshot};
pub use state::CoordinatorState;

pub use waypoint_storage::{Database, SnapshotStore, StorageError};

pub type Result<T> = std::result::Result<T, NavigationError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
