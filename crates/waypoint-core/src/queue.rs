//! Send queue
//!
//! Batches submitted through `send` are kept in submission order. Each batch
//! carries the scene its next action applies to; the resolver moves that
//! target as actions present, dismiss or switch scenes.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::action::NavigationAction;
use crate::coordinator::SceneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    #[default]
    Idle,
    Draining,
    /// Waiting for a presentation change to settle
    Settling,
    /// Waiting for an explicit resume
    Paused,
}

impl QueueStatus {
    /// Draining is driven by whoever set it; settling and paused wait on
    /// an external signal.
    pub fn is_suspended(&self) -> bool {
        matches!(self, QueueStatus::Settling | QueueStatus::Paused)
    }
}

struct SendBatch {
    target: SceneId,
    actions: VecDeque<NavigationAction>,
}

#[derive(Default)]
pub(crate) struct SendQueue {
    batches: VecDeque<SendBatch>,
    pub status: QueueStatus,
    /// Scene that was paused, resumed alongside the queue
    pub paused_scene: Option<SceneId>,
}

impl SendQueue {
    pub fn enqueue(&mut self, target: SceneId, actions: Vec<NavigationAction>) {
        if actions.is_empty() {
            return;
        }
        self.batches.push_back(SendBatch {
            target,
            actions: actions.into(),
        });
    }

    /// Next action with the scene it applies to
    pub fn next(&mut self) -> Option<(SceneId, NavigationAction)> {
        while let Some(batch) = self.batches.front_mut() {
            if let Some(action) = batch.actions.pop_front() {
                return Some((batch.target.clone(), action));
            }
            self.batches.pop_front();
        }
        None
    }

    /// Move the current batch's target
    pub fn retarget(&mut self, target: SceneId) {
        if let Some(batch) = self.batches.front_mut() {
            batch.target = target;
        }
    }

    pub fn current_target(&self) -> Option<&SceneId> {
        self.batches
            .iter()
            .find(|batch| !batch.actions.is_empty())
            .map(|batch| &batch.target)
    }

    pub fn remaining(&self) -> usize {
        self.batches.iter().map(|batch| batch.actions.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Drop what is left of the current batch
    pub fn discard_current(&mut self) -> usize {
        match self.batches.pop_front() {
            Some(batch) => batch.actions.len(),
            None => 0,
        }
    }

    /// Drop batches whose target no longer exists. Returns the number of
    /// actions discarded and whether the front batch was among them.
    pub fn discard_where(&mut self, mut is_gone: impl FnMut(&SceneId) -> bool) -> (usize, bool) {
        let mut discarded = 0;
        let mut front_discarded = false;
        let mut index = 0;

        self.batches.retain(|batch| {
            let gone = is_gone(&batch.target);
            if gone {
                discarded += batch.actions.len();
                front_discarded |= index == 0;
            }
            index += 1;
            !gone
        });

        (discarded, front_discarded)
    }
}
