//! Change notifications for the rendering layer

use tokio::sync::broadcast;

use crate::coordinator::SceneId;
use crate::destination::AnyDestination;
use crate::method::NavigationMethod;

#[derive(Debug, Clone)]
pub enum NavigationEvent {
    PathChanged {
        scene: SceneId,
        path: Vec<AnyDestination>,
    },
    Presented {
        scene: SceneId,
        child: SceneId,
        destination: AnyDestination,
        method: NavigationMethod,
    },
    Dismissed {
        scene: SceneId,
        child: SceneId,
    },
    PopoverPresented {
        scene: SceneId,
        child: SceneId,
        source_id: String,
        destination: AnyDestination,
    },
    PopoverDismissed {
        scene: SceneId,
        child: SceneId,
        source_id: String,
    },
    TabSelected {
        container: SceneId,
        tab: SceneId,
    },
    CheckpointReturned {
        scene: SceneId,
        checkpoint: String,
        position: usize,
    },
    /// Waiting for the renderer to report that a presentation change settled
    QueueSettling {
        scene: SceneId,
    },
    QueuePaused {
        scene: SceneId,
        remaining: usize,
    },
    QueueResumed {
        remaining: usize,
    },
    QueueCancelled {
        discarded: usize,
    },
    QueueDrained,
}

impl NavigationEvent {
    /// Events that change what is on screen, as opposed to queue bookkeeping
    pub fn is_visual(&self) -> bool {
        !matches!(
            self,
            NavigationEvent::QueueSettling { .. }
                | NavigationEvent::QueuePaused { .. }
                | NavigationEvent::QueueResumed { .. }
                | NavigationEvent::QueueCancelled { .. }
                | NavigationEvent::QueueDrained
        )
    }
}

pub(crate) struct EventPublisher {
    sender: broadcast::Sender<NavigationEvent>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: NavigationEvent) {
        // No subscribers is fine; state stays observable through the navigator
        let _ = self.sender.send(event);
    }
}
