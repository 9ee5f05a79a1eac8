//! Navigation checkpoints
//!
//! A checkpoint marks the position of a screen inside a scene's path. Any
//! screen presented or pushed above it can later "return" to it, optionally
//! handing back a value. Handlers are typed: a value is delivered only to
//! handlers registered for its exact type, and handlers stay registered for
//! repeated returns until their screen unmounts.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::coordinator::SceneId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationCheckpoint {
    name: Cow<'static, str>,
}

impl NavigationCheckpoint {
    /// Usable in consts: `const SETTINGS: NavigationCheckpoint = NavigationCheckpoint::named("settings");`
    pub const fn named(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
        }
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for NavigationCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&'static str> for NavigationCheckpoint {
    fn from(name: &'static str) -> Self {
        NavigationCheckpoint::named(name)
    }
}

/// Value handed back to a checkpoint
#[derive(Clone)]
pub struct CheckpointValue {
    value: Arc<dyn Any + Send + Sync>,
    type_id: TypeId,
    type_name: &'static str,
}

impl CheckpointValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        &*self.value
    }
}

impl fmt::Debug for CheckpointValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CheckpointValue<{}>", self.type_name)
    }
}

type HandlerFn = Rc<dyn Fn(&dyn Any)>;

#[derive(Clone)]
pub(crate) struct CheckpointHandler {
    registration: u64,
    type_id: TypeId,
    type_name: &'static str,
    callback: HandlerFn,
}

impl CheckpointHandler {
    pub fn typed<T: Any>(handler: impl Fn(&T) + 'static) -> Self {
        Self {
            registration: 0,
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            callback: Rc::new(move |value: &dyn Any| {
                if let Some(value) = value.downcast_ref::<T>() {
                    handler(value);
                }
            }),
        }
    }

    pub fn accepts(&self, value: &CheckpointValue) -> bool {
        self.type_id == value.type_id
    }

    pub fn invoke(&self, value: &CheckpointValue) {
        (self.callback)(value.as_any());
    }
}

/// Token returned when a checkpoint is established; pass it back to remove
/// exactly that registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointRegistration {
    pub checkpoint: NavigationCheckpoint,
    pub scene: SceneId,
    pub position: usize,
    id: u64,
}

/// Result of returning to a checkpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckpointOutcome {
    Returned {
        scene: SceneId,
        position: usize,
        handlers_invoked: usize,
    },
    NotFound,
}

impl CheckpointOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, CheckpointOutcome::Returned { .. })
    }
}

struct CheckpointEntry {
    checkpoint: NavigationCheckpoint,
    scene: SceneId,
    position: usize,
    registrations: Vec<u64>,
    handlers: Vec<CheckpointHandler>,
}

/// A checkpoint found for a return, with the handlers to run once the tree
/// has been unwound
pub(crate) struct CheckpointMatch {
    pub scene: SceneId,
    pub position: usize,
    pub handlers: Vec<CheckpointHandler>,
}

#[derive(Default)]
pub(crate) struct CheckpointRegistry {
    entries: Vec<CheckpointEntry>,
    next_registration: u64,
}

impl CheckpointRegistry {
    /// Record a checkpoint at `position` in `scene`. Establishing the same
    /// checkpoint twice at one position merges the registrations.
    pub fn establish(
        &mut self,
        scene: &SceneId,
        position: usize,
        checkpoint: NavigationCheckpoint,
        handler: Option<CheckpointHandler>,
    ) -> CheckpointRegistration {
        self.next_registration += 1;
        let id = self.next_registration;

        let index = match self.entries.iter().position(|entry| {
            entry.scene == *scene && entry.position == position && entry.checkpoint == checkpoint
        }) {
            Some(index) => index,
            None => {
                self.entries.push(CheckpointEntry {
                    checkpoint: checkpoint.clone(),
                    scene: scene.clone(),
                    position,
                    registrations: Vec::new(),
                    handlers: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        entry.registrations.push(id);
        if let Some(mut handler) = handler {
            handler.registration = id;
            tracing::debug!(
                checkpoint = %checkpoint,
                scene = %scene,
                position,
                value_type = handler.type_name,
                "Established checkpoint handler"
            );
            entry.handlers.push(handler);
        } else {
            tracing::debug!(checkpoint = %checkpoint, scene = %scene, position, "Established checkpoint");
        }

        CheckpointRegistration {
            checkpoint,
            scene: scene.clone(),
            position,
            id,
        }
    }

    pub fn remove(&mut self, registration: &CheckpointRegistration) -> bool {
        let mut removed = false;
        for entry in &mut self.entries {
            if let Some(index) = entry.registrations.iter().position(|id| *id == registration.id) {
                entry.registrations.remove(index);
                entry.handlers.retain(|h| h.registration != registration.id);
                removed = true;
            }
        }
        self.entries.retain(|entry| !entry.registrations.is_empty());
        removed
    }

    /// Drop checkpoints owned by screens that were popped off `scene`
    pub fn prune_above(&mut self, scene: &SceneId, path_len: usize) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.scene != *scene || entry.position <= path_len);
        before - self.entries.len()
    }

    pub fn remove_scene(&mut self, scene: &SceneId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.scene != *scene);
        before - self.entries.len()
    }

    /// Nearest checkpoint named `checkpoint` in `scene` at or below `max_position`
    pub fn find(
        &self,
        scene: &SceneId,
        checkpoint: &NavigationCheckpoint,
        max_position: usize,
    ) -> Option<CheckpointMatch> {
        self.entries
            .iter()
            .filter(|entry| {
                entry.scene == *scene
                    && entry.checkpoint == *checkpoint
                    && entry.position <= max_position
            })
            .max_by_key(|entry| entry.position)
            .map(|entry| CheckpointMatch {
                scene: entry.scene.clone(),
                position: entry.position,
                handlers: entry.handlers.clone(),
            })
    }

    pub fn count_in(&self, scene: &SceneId) -> usize {
        self.entries.iter().filter(|entry| entry.scene == *scene).count()
    }
}
