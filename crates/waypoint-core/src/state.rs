//! Coordinator State Machine
//!
//! ```text
//! Idle ──push──► Pushing ──pop to root──► Idle
//!   │               │
//!   └──present──────┴──► Presenting ──dismiss──► Idle / Pushing
//!
//! any non-paused state ──queue pause──► Paused ──resume──► settled state
//! ```
//!
//! A coordinator presents at most one item at a time, so Presenting does not
//! transition to itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinatorState {
    /// Nothing pushed, nothing presented
    #[default]
    Idle,
    /// Path is non-empty
    Pushing,
    /// A sheet, cover or popover is in flight
    Presenting,
    /// The send queue is halted here awaiting `resume()`
    Paused,
}

impl CoordinatorState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: CoordinatorState) -> bool {
        use CoordinatorState::*;

        match (self, target) {
            (Idle, Pushing) | (Idle, Presenting) | (Idle, Paused) => true,
            (Pushing, Pushing) | (Pushing, Idle) | (Pushing, Presenting) | (Pushing, Paused) => {
                true
            }
            (Presenting, Idle) | (Presenting, Pushing) | (Presenting, Paused) => true,
            (Paused, Idle) | (Paused, Pushing) | (Paused, Presenting) => true,
            // Only one presentation per coordinator
            (Presenting, Presenting) => false,
            (a, b) if *a == b => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoordinatorState::Idle => "idle",
            CoordinatorState::Pushing => "pushing",
            CoordinatorState::Presenting => "presenting",
            CoordinatorState::Paused => "paused",
        }
    }
}

impl std::fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
