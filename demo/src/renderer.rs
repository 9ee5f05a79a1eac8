//! Log renderer
//!
//! Stands in for a UI: prints every navigation event, reports presentation
//! changes as settled once "drawn", and finishes the loading screen by
//! resuming a paused queue.

use tokio::sync::broadcast::{self, error::TryRecvError};
use waypoint_core::{NavigationEvent, Navigator};

pub struct LogRenderer {
    navigator: Navigator,
    receiver: broadcast::Receiver<NavigationEvent>,
    frames: usize,
}

impl LogRenderer {
    pub fn new(navigator: &Navigator) -> Self {
        Self {
            navigator: navigator.root(),
            receiver: navigator.subscribe(),
            frames: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Render pending events, including those caused by settling or
    /// resuming along the way. Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;

        loop {
            let event = match self.receiver.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Renderer fell behind");
                    continue;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            };

            handled += 1;
            self.render(&event);

            match event {
                NavigationEvent::QueueSettling { .. } => {
                    self.navigator.presentation_settled();
                }
                NavigationEvent::QueuePaused { scene, remaining } => {
                    tracing::info!(scene = %scene, remaining, "Loading finished");
                    self.navigator.resume();
                }
                _ => {}
            }
        }

        handled
    }

    fn render(&mut self, event: &NavigationEvent) {
        if event.is_visual() {
            self.frames += 1;
        }

        match event {
            NavigationEvent::PathChanged { scene, path } => {
                let titles: Vec<String> = path
                    .iter()
                    .map(|d| d.body().display_title().to_string())
                    .collect();
                tracing::info!(scene = %scene, path = ?titles, "render stack");
            }
            NavigationEvent::Presented { scene, child, destination, method } => {
                let body = destination.body();
                tracing::info!(
                    scene = %scene,
                    child = %child,
                    method = %method,
                    view = %body.view,
                    "render presentation"
                );
            }
            NavigationEvent::Dismissed { scene, child } => {
                tracing::info!(scene = %scene, child = %child, "remove presentation");
            }
            NavigationEvent::PopoverPresented { source_id, destination, .. } => {
                let body = destination.body();
                tracing::info!(source = %source_id, title = body.display_title(), "render popover");
            }
            NavigationEvent::PopoverDismissed { source_id, .. } => {
                tracing::info!(source = %source_id, "remove popover");
            }
            NavigationEvent::TabSelected { container, tab } => {
                tracing::info!(container = %container, tab = %tab, "select tab");
            }
            NavigationEvent::CheckpointReturned { scene, checkpoint, position } => {
                tracing::info!(scene = %scene, checkpoint = %checkpoint, position, "returned to checkpoint");
            }
            other => tracing::debug!(event = ?other, "queue event"),
        }
    }
}
