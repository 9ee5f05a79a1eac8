//! Navigation actions
//!
//! The vocabulary accepted by `Navigator::send`. A sequence is consumed left
//! to right, each action against whichever scene the previous one left as
//! the target.

use crate::checkpoint::{CheckpointValue, NavigationCheckpoint};
use crate::coordinator::SceneId;
use crate::destination::{AnyDestination, NavigationDestination};
use crate::method::NavigationMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopCount {
    Count(usize),
    ToRoot,
}

#[derive(Debug, Clone)]
pub enum NavigationAction {
    /// Navigate with an explicit method
    Navigate {
        destination: AnyDestination,
        method: NavigationMethod,
    },
    Push(AnyDestination),
    Pop(PopCount),
    /// Pop to root in the named scene, or the current one
    PopAll { scene: Option<SceneId> },
    Dismiss,
    DismissAny,
    /// Dismiss everything presented in or below the target scene, tabs included
    DismissAll,
    PresentSheet(AnyDestination),
    PresentCover(AnyDestination),
    PresentPopover {
        destination: AnyDestination,
        source_id: Option<String>,
    },
    ReturnToCheckpoint {
        checkpoint: NavigationCheckpoint,
        value: Option<CheckpointValue>,
    },
    /// Select a tab; later actions target it
    SceneSwitch(SceneId),
    /// Navigate using the destination's own method
    Destination(AnyDestination),
}

impl NavigationAction {
    pub fn navigate<D: NavigationDestination>(destination: D, method: NavigationMethod) -> Self {
        NavigationAction::Navigate {
            destination: destination.into(),
            method,
        }
    }

    pub fn push<D: NavigationDestination>(destination: D) -> Self {
        NavigationAction::Push(destination.into())
    }

    pub fn pop(count: usize) -> Self {
        NavigationAction::Pop(PopCount::Count(count))
    }

    pub fn pop_to_root() -> Self {
        NavigationAction::Pop(PopCount::ToRoot)
    }

    pub fn pop_all(scene: impl Into<SceneId>) -> Self {
        NavigationAction::PopAll {
            scene: Some(scene.into()),
        }
    }

    pub fn present_sheet<D: NavigationDestination>(destination: D) -> Self {
        NavigationAction::PresentSheet(destination.into())
    }

    pub fn present_cover<D: NavigationDestination>(destination: D) -> Self {
        NavigationAction::PresentCover(destination.into())
    }

    pub fn present_popover<D: NavigationDestination>(
        destination: D,
        source_id: Option<&str>,
    ) -> Self {
        NavigationAction::PresentPopover {
            destination: destination.into(),
            source_id: source_id.map(str::to_string),
        }
    }

    pub fn return_to_checkpoint(checkpoint: NavigationCheckpoint) -> Self {
        NavigationAction::ReturnToCheckpoint {
            checkpoint,
            value: None,
        }
    }

    pub fn return_to_checkpoint_with<T: std::any::Any + Send + Sync>(
        checkpoint: NavigationCheckpoint,
        value: T,
    ) -> Self {
        NavigationAction::ReturnToCheckpoint {
            checkpoint,
            value: Some(CheckpointValue::new(value)),
        }
    }

    pub fn switch_to(scene: impl Into<SceneId>) -> Self {
        NavigationAction::SceneSwitch(scene.into())
    }

    /// Destination this action navigates to, with the method it will use
    pub fn destination(&self) -> Option<(&AnyDestination, NavigationMethod)> {
        match self {
            NavigationAction::Navigate {
                destination,
                method,
            } => Some((destination, method.clone())),
            NavigationAction::Push(destination) => Some((destination, NavigationMethod::Push)),
            NavigationAction::PresentSheet(destination) => {
                Some((destination, NavigationMethod::Sheet))
            }
            NavigationAction::PresentCover(destination) => {
                Some((destination, NavigationMethod::Cover))
            }
            NavigationAction::PresentPopover {
                destination,
                source_id,
            } => Some((
                destination,
                NavigationMethod::Popover {
                    source_id: source_id.clone(),
                },
            )),
            NavigationAction::Destination(destination) => Some((destination, destination.method())),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavigationAction::Navigate { .. } => "navigate",
            NavigationAction::Push(_) => "push",
            NavigationAction::Pop(_) => "pop",
            NavigationAction::PopAll { .. } => "popAll",
            NavigationAction::Dismiss => "dismiss",
            NavigationAction::DismissAny => "dismissAny",
            NavigationAction::DismissAll => "dismissAll",
            NavigationAction::PresentSheet(_) => "presentSheet",
            NavigationAction::PresentCover(_) => "presentCover",
            NavigationAction::PresentPopover { .. } => "presentPopover",
            NavigationAction::ReturnToCheckpoint { .. } => "returnToCheckpoint",
            NavigationAction::SceneSwitch(_) => "sceneSwitch",
            NavigationAction::Destination(_) => "destination",
        }
    }
}

impl<D: NavigationDestination> From<D> for NavigationAction {
    fn from(destination: D) -> Self {
        NavigationAction::Destination(destination.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::fixtures::{HomeDestinations, SettingsDestinations};

    #[test]
    fn test_destination_methods() {
        let action: NavigationAction = HomeDestinations::Presented1.into();
        let (destination, method) = action.destination().unwrap();
        assert_eq!(*destination, AnyDestination::new(HomeDestinations::Presented1));
        assert_eq!(method, NavigationMethod::ManagedSheet);

        let (_, method) = NavigationAction::push(HomeDestinations::Presented1)
            .destination()
            .unwrap();
        assert_eq!(method, NavigationMethod::Push);

        let (_, method) = NavigationAction::present_popover(SettingsDestinations::Page2, Some("help"))
            .destination()
            .unwrap();
        assert_eq!(method, NavigationMethod::popover("help"));

        assert!(NavigationAction::DismissAny.destination().is_none());
    }

    #[test]
    fn test_labels() {
        assert_eq!(NavigationAction::pop(2).label(), "pop");
        assert_eq!(NavigationAction::switch_to("home").label(), "sceneSwitch");
        assert_eq!(
            NavigationAction::return_to_checkpoint_with(NavigationCheckpoint::named("settings"), 5)
                .label(),
            "returnToCheckpoint"
        );
    }
}
