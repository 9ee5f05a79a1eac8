//! Per-scene coordinator state
//!
//! Coordinators live in the navigation tree's arena keyed by [`SceneId`].
//! Parent and child links are ids, never owning references.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use crate::destination::AnyDestination;
use crate::error::NavigationError;
use crate::method::NavigationMethod;
use crate::state::CoordinatorState;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub const ROOT: &'static str = "root";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    /// Fresh id for a presented item's scene
    pub fn generate(method: &NavigationMethod) -> Self {
        Self(format!("{}-{}", method.as_str(), Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(id: &str) -> Self {
        SceneId::new(id)
    }
}

impl From<String> for SceneId {
    fn from(id: String) -> Self {
        SceneId(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneKind {
    Root,
    Tab,
    /// Scene hosting a presented item
    Presentation,
}

/// An item presented by a coordinator, hosted in its own child scene
#[derive(Debug, Clone)]
pub(crate) struct Presentation {
    pub destination: AnyDestination,
    pub method: NavigationMethod,
    pub child: SceneId,
    /// Resolved anchor for popovers
    pub source_id: Option<String>,
}

pub(crate) struct Coordinator {
    pub id: SceneId,
    pub kind: SceneKind,
    pub parent: Option<SceneId>,
    pub has_stack: bool,
    pub path: Vec<AnyDestination>,
    pub presented: Option<Presentation>,
    pub popover: Option<Presentation>,
    pub tabs: Vec<SceneId>,
    pub selected_tab: Option<SceneId>,
    /// Type keys registered with this scene's stack
    pub registered: HashSet<&'static str>,
    pub state: CoordinatorState,
}

impl Coordinator {
    pub fn new(id: SceneId, kind: SceneKind, parent: Option<SceneId>, has_stack: bool) -> Self {
        Self {
            id,
            kind,
            parent,
            has_stack,
            path: Vec::new(),
            presented: None,
            popover: None,
            tabs: Vec::new(),
            selected_tab: None,
            registered: HashSet::new(),
            state: CoordinatorState::Idle,
        }
    }

    pub fn active_presentation(&self) -> Option<&Presentation> {
        self.presented.as_ref().or(self.popover.as_ref())
    }

    /// Take whichever presentation slot hosts `child`
    pub fn take_presentation_of(&mut self, child: &SceneId) -> Option<Presentation> {
        if self.presented.as_ref().is_some_and(|p| p.child == *child) {
            return self.presented.take();
        }
        if self.popover.as_ref().is_some_and(|p| p.child == *child) {
            return self.popover.take();
        }
        None
    }

    /// Tabs first, then the presented item's scene
    pub fn children(&self) -> Vec<SceneId> {
        let mut children = self.tabs.clone();
        children.extend(self.presented.iter().map(|p| p.child.clone()));
        children.extend(self.popover.iter().map(|p| p.child.clone()));
        children
    }

    /// State implied by the current path and presentation slots
    pub fn settled_state(&self) -> CoordinatorState {
        if self.active_presentation().is_some() {
            CoordinatorState::Presenting
        } else if !self.path.is_empty() {
            CoordinatorState::Pushing
        } else {
            CoordinatorState::Idle
        }
    }

    /// Attempt to transition to a new state
    pub fn transition_to(&mut self, new_state: CoordinatorState) -> Result<(), NavigationError> {
        if !self.state.can_transition_to(new_state) {
            return Err(NavigationError::InvalidTransition {
                from: self.state.to_string(),
                to: new_state.to_string(),
            });
        }

        if self.state != new_state {
            tracing::debug!(
                scene = %self.id,
                from = %self.state,
                to = %new_state,
                "Coordinator state transition"
            );
        }

        self.state = new_state;
        Ok(())
    }

    /// Follow path and presentation changes; a paused coordinator stays
    /// paused until the queue resumes it.
    pub fn sync_state(&mut self) {
        if self.state == CoordinatorState::Paused {
            return;
        }
        let next = self.settled_state();
        if next != self.state {
            if let Err(e) = self.transition_to(next) {
                tracing::warn!(scene = %self.id, error = %e, "Coordinator state out of sync");
                self.state = next;
            }
        }
    }

    pub fn pause(&mut self) {
        if let Err(e) = self.transition_to(CoordinatorState::Paused) {
            tracing::warn!(scene = %self.id, error = %e, "Unable to pause coordinator");
        }
    }

    pub fn resume(&mut self) {
        if self.state == CoordinatorState::Paused {
            let next = self.settled_state();
            self.state = next;
            tracing::debug!(scene = %self.id, to = %next, "Coordinator resumed");
        }
    }
}
