//! State restoration
//!
//! Snapshots cover the root and tab scenes: their stacks and tab selection.
//! Presented items are transient and are not saved. Destinations are stored
//! by type key, so only types registered in the restoring tree come back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use waypoint_storage::SnapshotStore;

use crate::coordinator::{SceneId, SceneKind};
use crate::destination::EncodedDestination;
use crate::event::NavigationEvent;
use crate::navigator::Navigator;
use crate::tree::NavigationTree;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub scene: SceneId,
    pub selected_tab: Option<SceneId>,
    pub path: Vec<EncodedDestination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    pub restoration_key: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub scenes: Vec<SceneSnapshot>,
}

impl NavigationSnapshot {
    pub fn scene(&self, scene: &SceneId) -> Option<&SceneSnapshot> {
        self.scenes.iter().find(|s| s.scene == *scene)
    }
}

impl NavigationTree {
    fn snapshot(&self) -> Result<NavigationSnapshot> {
        let mut scenes = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(id) = pending.pop() {
            let coordinator = self.coordinator(&id)?;
            let path = coordinator
                .path
                .iter()
                .map(|destination| destination.encode())
                .collect::<serde_json::Result<Vec<_>>>()?;

            scenes.push(SceneSnapshot {
                scene: id,
                selected_tab: coordinator.selected_tab.clone(),
                path,
            });
            pending.extend(coordinator.tabs.iter().rev().cloned());
        }

        Ok(NavigationSnapshot {
            restoration_key: self.config.restoration_key.clone(),
            saved_at: Utc::now(),
            scenes,
        })
    }

    fn restore(&mut self, snapshot: &NavigationSnapshot) -> usize {
        let mut restored = 0;

        for saved in &snapshot.scenes {
            match self.scenes.get(&saved.scene).map(|c| c.kind.clone()) {
                Some(SceneKind::Root) | Some(SceneKind::Tab) => {}
                _ => {
                    tracing::debug!(scene = %saved.scene, "Skipping snapshot of unknown scene");
                    continue;
                }
            }

            let mut path = Vec::with_capacity(saved.path.len());
            for encoded in &saved.path {
                match self.destinations.decode(encoded) {
                    Some(Ok(destination)) => path.push(destination),
                    Some(Err(e)) => {
                        tracing::warn!(
                            scene = %saved.scene,
                            type_key = %encoded.type_key,
                            error = %e,
                            "Failed to decode saved destination; truncating path"
                        );
                        break;
                    }
                    None => {
                        tracing::warn!(
                            scene = %saved.scene,
                            type_key = %encoded.type_key,
                            "Saved destination type is not registered; truncating path"
                        );
                        break;
                    }
                }
            }

            let Some(coordinator) = self.scenes.get_mut(&saved.scene) else {
                continue;
            };
            coordinator.path = path.clone();
            coordinator.sync_state();

            let selected = saved
                .selected_tab
                .as_ref()
                .filter(|tab| coordinator.tabs.contains(tab))
                .cloned();
            if let Some(tab) = &selected {
                coordinator.selected_tab = Some(tab.clone());
            }

            self.checkpoints.prune_above(&saved.scene, path.len());
            tracing::debug!(scene = %saved.scene, depth = path.len(), "Restored scene path");

            self.emit(NavigationEvent::PathChanged {
                scene: saved.scene.clone(),
                path,
            });
            if let Some(tab) = selected {
                self.emit(NavigationEvent::TabSelected {
                    container: saved.scene.clone(),
                    tab,
                });
            }
            restored += 1;
        }

        restored
    }
}

impl Navigator {
    /// Capture the stacks and tab selection of the whole tree
    pub fn snapshot(&self) -> Result<NavigationSnapshot> {
        self.tree().borrow().snapshot()
    }

    /// Apply a snapshot to scenes that exist in this tree. Returns the
    /// number of scenes restored.
    pub fn restore(&self, snapshot: &NavigationSnapshot) -> usize {
        let restored = self.tree().borrow_mut().restore(snapshot);
        tracing::info!(
            restoration_key = ?snapshot.restoration_key,
            restored,
            "Restored navigation state"
        );
        restored
    }

    /// Save a snapshot under the configured restoration key. Returns false
    /// when restoration is not configured.
    pub fn save_state(&self, store: &SnapshotStore) -> Result<bool> {
        let Some(key) = self.config().restoration_key else {
            return Ok(false);
        };
        let snapshot = self.snapshot()?;
        store.save(&key, &snapshot, snapshot.scenes.len())?;
        tracing::info!(restoration_key = %key, scenes = snapshot.scenes.len(), "Saved navigation state");
        Ok(true)
    }

    /// Restore from the snapshot saved under the configured restoration key
    pub fn restore_state(&self, store: &SnapshotStore) -> Result<usize> {
        let Some(key) = self.config().restoration_key else {
            return Ok(0);
        };
        let Some(stored) = store.load(&key)? else {
            tracing::debug!(restoration_key = %key, "No saved navigation state");
            return Ok(0);
        };
        let snapshot: NavigationSnapshot = stored.decode()?;
        Ok(self.restore(&snapshot))
    }
}
