//! Navigation tree
//!
//! Arena of coordinators plus the registries and send queue they share.
//! Everything here runs on the coordination thread behind the navigator's
//! `RefCell`; checkpoint handlers are returned as effects and run by the
//! navigator after the borrow is released.

use std::collections::HashMap;

use crate::action::{NavigationAction, PopCount};
use crate::checkpoint::{
    CheckpointHandler, CheckpointOutcome, CheckpointRegistry, CheckpointValue, NavigationCheckpoint,
};
use crate::config::NavigationConfig;
use crate::coordinator::{Coordinator, Presentation, SceneId, SceneKind};
use crate::destination::{AnyDestination, DestinationTypes, NavigationDestination, ReceiveResumeType};
use crate::error::NavigationError;
use crate::event::{EventPublisher, NavigationEvent};
use crate::method::NavigationMethod;
use crate::popover::PopoverSourceRegistry;
use crate::queue::{QueueStatus, SendQueue};
use crate::Result;

/// Work deferred until the tree is no longer borrowed
pub(crate) enum Effect {
    Checkpoint {
        handlers: Vec<CheckpointHandler>,
        value: CheckpointValue,
    },
}

pub(crate) enum Navigated {
    Pushed,
    Presented(SceneId),
}

#[derive(Default)]
struct Applied {
    next_target: Option<SceneId>,
    presentation_changed: bool,
    navigated: Option<AnyDestination>,
}

pub(crate) fn log_skipped(scene: &SceneId, operation: &str, error: &NavigationError) {
    if error.is_configuration() {
        tracing::warn!(scene = %scene, operation, error = %error, "Navigation skipped");
    } else {
        tracing::debug!(scene = %scene, operation, error = %error, "Navigation had no effect");
    }
}

pub(crate) struct NavigationTree {
    pub scenes: HashMap<SceneId, Coordinator>,
    pub root: SceneId,
    pub destinations: DestinationTypes,
    pub checkpoints: CheckpointRegistry,
    pub queue: SendQueue,
    pub popovers: PopoverSourceRegistry,
    pub config: NavigationConfig,
    events: EventPublisher,
}

impl NavigationTree {
    pub fn new(config: NavigationConfig, popovers: PopoverSourceRegistry) -> Self {
        let root = SceneId::root();
        let mut scenes = HashMap::new();
        scenes.insert(
            root.clone(),
            Coordinator::new(root.clone(), SceneKind::Root, None, true),
        );

        Self {
            scenes,
            root,
            destinations: DestinationTypes::default(),
            checkpoints: CheckpointRegistry::default(),
            queue: SendQueue::default(),
            popovers,
            events: EventPublisher::new(config.event_capacity),
            config,
        }
    }

    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    pub fn emit(&self, event: NavigationEvent) {
        self.events.publish(event);
    }

    pub fn contains(&self, scene: &SceneId) -> bool {
        self.scenes.contains_key(scene)
    }

    pub fn coordinator(&self, scene: &SceneId) -> Result<&Coordinator> {
        self.scenes
            .get(scene)
            .ok_or_else(|| NavigationError::SceneNotFound(scene.to_string()))
    }

    pub fn coordinator_mut(&mut self, scene: &SceneId) -> Result<&mut Coordinator> {
        self.scenes
            .get_mut(scene)
            .ok_or_else(|| NavigationError::SceneNotFound(scene.to_string()))
    }

    /// `scene` followed by its ancestors up to the root
    pub fn ancestry(&self, scene: &SceneId) -> Vec<SceneId> {
        let mut chain = Vec::new();
        let mut current = self.scenes.get(scene);
        while let Some(coordinator) = current {
            chain.push(coordinator.id.clone());
            current = coordinator
                .parent
                .as_ref()
                .and_then(|parent| self.scenes.get(parent));
        }
        chain
    }

    // Registration and tabs

    pub fn register<D: NavigationDestination>(&mut self, scene: &SceneId) -> Result<()> {
        let key = self.destinations.register::<D>();
        self.coordinator_mut(scene)?.registered.insert(key);
        tracing::debug!(scene = %scene, type_key = key, "Registered destination type");
        Ok(())
    }

    /// Registrations are inherited by nested scenes
    fn is_registered(&self, scene: &SceneId, type_key: &str) -> bool {
        self.ancestry(scene).iter().any(|id| {
            self.scenes
                .get(id)
                .is_some_and(|c| c.registered.contains(type_key))
        })
    }

    pub fn add_tab(&mut self, container: &SceneId, tab: SceneId) -> Result<()> {
        if let Some(existing) = self.scenes.get(&tab) {
            if existing.parent.as_ref() == Some(container) && existing.kind == SceneKind::Tab {
                return Ok(());
            }
            return Err(NavigationError::DuplicateScene(tab.to_string()));
        }

        let parent = self.coordinator_mut(container)?;
        parent.tabs.push(tab.clone());
        let select = parent.selected_tab.is_none();
        if select {
            parent.selected_tab = Some(tab.clone());
        }

        self.scenes.insert(
            tab.clone(),
            Coordinator::new(tab.clone(), SceneKind::Tab, Some(container.clone()), true),
        );

        tracing::info!(container = %container, tab = %tab, selected = select, "Added tab scene");
        Ok(())
    }

    /// Select a tab in whichever container owns it
    pub fn select_tab(&mut self, tab: &SceneId) -> Result<SceneId> {
        let container = match self.scenes.get(tab) {
            Some(c) if c.kind == SceneKind::Tab => c.parent.clone(),
            _ => None,
        }
        .ok_or_else(|| NavigationError::SceneNotFound(tab.to_string()))?;

        let coordinator = self.coordinator_mut(&container)?;
        if coordinator.selected_tab.as_ref() != Some(tab) {
            coordinator.selected_tab = Some(tab.clone());
            tracing::info!(container = %container, tab = %tab, "Selected tab");
        }

        self.emit(NavigationEvent::TabSelected {
            container: container.clone(),
            tab: tab.clone(),
        });
        Ok(container)
    }

    // Stack operations

    pub fn push(&mut self, scene: &SceneId, destination: AnyDestination) -> Result<()> {
        let coordinator = self.coordinator(scene)?;
        if !coordinator.has_stack {
            return Err(NavigationError::NoNavigationStack(scene.to_string()));
        }
        if !self.is_registered(scene, destination.type_key()) {
            return Err(NavigationError::UnregisteredDestination {
                scene: scene.to_string(),
                type_key: destination.type_key().to_string(),
            });
        }

        tracing::info!(scene = %scene, destination = ?destination, "Pushed destination");

        let coordinator = self.coordinator_mut(scene)?;
        coordinator.path.push(destination);
        coordinator.sync_state();
        let path = coordinator.path.clone();

        self.emit(NavigationEvent::PathChanged {
            scene: scene.clone(),
            path,
        });
        Ok(())
    }

    /// Pop `count` entries, clamped to the root
    pub fn pop(&mut self, scene: &SceneId, count: PopCount) -> Result<usize> {
        let coordinator = self.coordinator_mut(scene)?;
        let len = coordinator.path.len();
        let popped = match count {
            PopCount::Count(n) => {
                if n > len {
                    tracing::debug!(scene = %scene, requested = n, available = len, "Pop clamped to root");
                }
                n.min(len)
            }
            PopCount::ToRoot => len,
        };

        if popped == 0 {
            return Ok(0);
        }

        coordinator.path.truncate(len - popped);
        coordinator.sync_state();
        let path = coordinator.path.clone();

        let pruned = self.checkpoints.prune_above(scene, path.len());
        tracing::info!(scene = %scene, popped, pruned_checkpoints = pruned, "Popped destinations");

        self.emit(NavigationEvent::PathChanged {
            scene: scene.clone(),
            path,
        });
        Ok(popped)
    }

    // Presentation

    pub fn navigate(
        &mut self,
        scene: &SceneId,
        destination: AnyDestination,
        method: NavigationMethod,
    ) -> Result<Navigated> {
        if method.is_presentation() {
            self.present(scene, destination, method).map(Navigated::Presented)
        } else {
            self.push(scene, destination).map(|_| Navigated::Pushed)
        }
    }

    /// Present `destination` from `scene`, returning the new child scene
    pub fn present(
        &mut self,
        scene: &SceneId,
        destination: AnyDestination,
        method: NavigationMethod,
    ) -> Result<SceneId> {
        let coordinator = self.coordinator(scene)?;
        if coordinator.active_presentation().is_some() {
            return Err(NavigationError::InvalidTransition {
                from: coordinator.state.to_string(),
                to: "presenting".to_string(),
            });
        }

        let source_id = if method.is_popover() {
            let explicit = method.popover_source_id();
            let resolved = match explicit {
                Some(_) => self.popovers.resolve_target(explicit),
                None if self.config.auto_detect_popover_source => {
                    self.popovers.resolve_target(None)
                }
                None => None,
            };
            let source = resolved.ok_or_else(|| {
                NavigationError::MissingPopoverSource(format!("{:?} via {}", destination, method))
            })?;
            Some(source.id)
        } else {
            None
        };

        let child = SceneId::generate(&method);
        self.scenes.insert(
            child.clone(),
            Coordinator::new(
                child.clone(),
                SceneKind::Presentation,
                Some(scene.clone()),
                method.requires_navigation_stack(),
            ),
        );

        let presentation = Presentation {
            destination: destination.clone(),
            method: method.clone(),
            child: child.clone(),
            source_id: source_id.clone(),
        };

        let coordinator = self.coordinator_mut(scene)?;
        if method.is_popover() {
            coordinator.popover = Some(presentation);
        } else {
            coordinator.presented = Some(presentation);
        }
        coordinator.sync_state();

        tracing::info!(
            scene = %scene,
            child = %child,
            method = %method,
            destination = ?destination,
            "Presented destination"
        );

        match source_id {
            Some(source_id) => {
                self.popovers.present(&source_id, destination.clone());
                self.emit(NavigationEvent::PopoverPresented {
                    scene: scene.clone(),
                    child: child.clone(),
                    source_id,
                    destination,
                });
            }
            None => self.emit(NavigationEvent::Presented {
                scene: scene.clone(),
                child: child.clone(),
                destination,
                method,
            }),
        }

        Ok(child)
    }

    /// Dismiss the item hosted in `child`, presented by `parent`
    fn dismiss_child(&mut self, parent: &SceneId, child: &SceneId) -> bool {
        let Some(coordinator) = self.scenes.get_mut(parent) else {
            return false;
        };
        let Some(presentation) = coordinator.take_presentation_of(child) else {
            return false;
        };
        coordinator.sync_state();

        let removed = self.remove_subtree(child);
        tracing::info!(
            scene = %parent,
            child = %child,
            removed_scenes = removed.len(),
            "Dismissed presentation"
        );

        match presentation.source_id {
            Some(source_id) => {
                self.popovers.clear(&source_id);
                self.emit(NavigationEvent::PopoverDismissed {
                    scene: parent.clone(),
                    child: child.clone(),
                    source_id,
                });
            }
            None => self.emit(NavigationEvent::Dismissed {
                scene: parent.clone(),
                child: child.clone(),
            }),
        }
        true
    }

    /// Remove `scene` and every scene below it, with their checkpoints and
    /// popover bindings
    fn remove_subtree(&mut self, scene: &SceneId) -> Vec<SceneId> {
        let mut removed = Vec::new();
        let mut pending = vec![scene.clone()];

        while let Some(id) = pending.pop() {
            let Some(coordinator) = self.scenes.remove(&id) else {
                continue;
            };
            if let Some(source_id) = coordinator.popover.as_ref().and_then(|p| p.source_id.as_ref()) {
                self.popovers.clear(source_id);
            }
            pending.extend(coordinator.children());
            self.checkpoints.remove_scene(&id);
            removed.push(id);
        }

        removed
    }

    /// Dismiss this scene if it is a presented item, otherwise whatever it
    /// presents. Returns the presenting scene.
    pub fn dismiss(&mut self, scene: &SceneId) -> Result<Option<SceneId>> {
        let coordinator = self.coordinator(scene)?;

        if coordinator.kind == SceneKind::Presentation {
            if let Some(parent) = coordinator.parent.clone() {
                if self.dismiss_child(&parent, scene) {
                    return Ok(Some(parent));
                }
            }
            return Ok(None);
        }

        if let Some(child) = coordinator.active_presentation().map(|p| p.child.clone()) {
            if self.dismiss_child(scene, &child) {
                return Ok(Some(scene.clone()));
            }
        }
        Ok(None)
    }

    /// Dismiss the first presentation found walking outward from `scene`.
    /// When nothing on that chain presents, search down from the root,
    /// selected tabs first, so a modal shown by a sibling tab is found too.
    pub fn dismiss_any(&mut self, scene: &SceneId) -> Result<Option<SceneId>> {
        self.coordinator(scene)?;

        let found = self
            .ancestry(scene)
            .into_iter()
            .find_map(|id| self.presentation_in(&id))
            .or_else(|| self.first_presentation_below(&self.root));

        if let Some((presenter, child)) = found {
            if self.dismiss_child(&presenter, &child) {
                return Ok(Some(presenter));
            }
        }

        tracing::debug!(scene = %scene, "Nothing to dismiss");
        Ok(None)
    }

    fn presentation_in(&self, scene: &SceneId) -> Option<(SceneId, SceneId)> {
        let child = self.scenes.get(scene)?.active_presentation()?.child.clone();
        Some((scene.clone(), child))
    }

    /// Depth-first over tabs, visiting each container's selected tab first
    fn first_presentation_below(&self, scene: &SceneId) -> Option<(SceneId, SceneId)> {
        let mut pending = vec![scene.clone()];
        while let Some(id) = pending.pop() {
            let Some(coordinator) = self.scenes.get(&id) else {
                continue;
            };
            if let Some(found) = self.presentation_in(&id) {
                return Some(found);
            }

            let selected = coordinator.selected_tab.as_ref();
            pending.extend(
                coordinator
                    .tabs
                    .iter()
                    .rev()
                    .filter(|tab| Some(*tab) != selected)
                    .cloned(),
            );
            pending.extend(selected.cloned());
        }
        None
    }

    /// Dismiss everything presented in `scene` or any tab below it
    pub fn dismiss_presented_views(&mut self, scene: &SceneId) -> Result<bool> {
        self.coordinator(scene)?;

        let mut dismissed = false;
        let mut pending = vec![scene.clone()];
        while let Some(id) = pending.pop() {
            let Some(coordinator) = self.scenes.get(&id) else {
                continue;
            };
            pending.extend(coordinator.tabs.iter().cloned());
            let children: Vec<SceneId> = coordinator
                .presented
                .iter()
                .chain(coordinator.popover.iter())
                .map(|p| p.child.clone())
                .collect();
            for child in children {
                dismissed |= self.dismiss_child(&id, &child);
            }
        }
        Ok(dismissed)
    }

    /// Tear down a scene: presented items are dismissed, tabs removed
    pub fn unmount(&mut self, scene: &SceneId) -> Result<Vec<SceneId>> {
        let coordinator = self.coordinator(scene)?;
        let parent = coordinator.parent.clone();

        match (coordinator.kind.clone(), parent) {
            (SceneKind::Root, _) | (_, None) => Err(NavigationError::RootNotDismissible),
            (SceneKind::Presentation, Some(parent)) => {
                self.dismiss_child(&parent, scene);
                Ok(vec![scene.clone()])
            }
            (SceneKind::Tab, Some(container)) => {
                if let Some(container) = self.scenes.get_mut(&container) {
                    container.tabs.retain(|id| id != scene);
                    if container.selected_tab.as_ref() == Some(scene) {
                        container.selected_tab = container.tabs.first().cloned();
                    }
                }
                let removed = self.remove_subtree(scene);
                tracing::info!(tab = %scene, removed_scenes = removed.len(), "Unmounted tab scene");
                Ok(removed)
            }
        }
    }

    // Checkpoints

    pub fn establish_checkpoint(
        &mut self,
        scene: &SceneId,
        checkpoint: NavigationCheckpoint,
        handler: Option<CheckpointHandler>,
    ) -> Result<crate::checkpoint::CheckpointRegistration> {
        let position = self.coordinator(scene)?.path.len();
        Ok(self
            .checkpoints
            .establish(scene, position, checkpoint, handler))
    }

    /// Unwind to the nearest checkpoint named `checkpoint`, walking outward
    /// from `scene`. Matching handlers are pushed onto `effects`.
    pub fn return_to_checkpoint(
        &mut self,
        scene: &SceneId,
        checkpoint: &NavigationCheckpoint,
        mut value: Option<CheckpointValue>,
        effects: &mut Vec<Effect>,
    ) -> Result<CheckpointOutcome> {
        self.coordinator(scene)?;

        let chain = self.ancestry(scene);
        for (depth, id) in chain.iter().enumerate() {
            let len = self.coordinator(id)?.path.len();
            let Some(found) = self.checkpoints.find(id, checkpoint, len) else {
                continue;
            };

            // The outermost presented scene between the caller and the
            // checkpoint takes every presentation above it along
            let outermost = chain[..depth]
                .iter()
                .rev()
                .find(|between| {
                    self.scenes
                        .get(*between)
                        .is_some_and(|c| c.kind == SceneKind::Presentation)
                })
                .and_then(|between| {
                    let parent = self.scenes.get(between)?.parent.clone()?;
                    Some((parent, between.clone()))
                });
            if let Some((parent, child)) = outermost {
                self.dismiss_child(&parent, &child);
            }
            if let Some((presenter, child)) = self.presentation_in(id) {
                self.dismiss_child(&presenter, &child);
            }
            self.pop(id, PopCount::Count(len - found.position))?;

            let mut handlers_invoked = 0;
            if let Some(value) = value.take() {
                let handlers: Vec<CheckpointHandler> = found
                    .handlers
                    .into_iter()
                    .filter(|handler| handler.accepts(&value))
                    .collect();

                if handlers.is_empty() {
                    tracing::warn!(
                        checkpoint = %checkpoint,
                        value_type = value.type_name(),
                        "No checkpoint handler accepts value; dropped"
                    );
                } else {
                    handlers_invoked = handlers.len();
                    effects.push(Effect::Checkpoint { handlers, value });
                }
            }

            tracing::info!(
                checkpoint = %checkpoint,
                scene = %id,
                position = found.position,
                handlers_invoked,
                "Returned to checkpoint"
            );

            self.emit(NavigationEvent::CheckpointReturned {
                scene: id.clone(),
                checkpoint: checkpoint.name().to_string(),
                position: found.position,
            });

            return Ok(CheckpointOutcome::Returned {
                scene: id.clone(),
                position: found.position,
                handlers_invoked,
            });
        }

        tracing::debug!(checkpoint = %checkpoint, scene = %scene, "Checkpoint not found");
        Ok(CheckpointOutcome::NotFound)
    }

    // Send queue

    /// Start draining if the queue is idle
    pub fn begin_drain(&mut self) -> bool {
        if self.queue.status != QueueStatus::Idle || self.queue.is_empty() {
            return false;
        }
        self.queue.status = QueueStatus::Draining;
        true
    }

    pub fn resume_queue(&mut self) -> bool {
        if self.queue.status != QueueStatus::Paused {
            tracing::debug!("Resume requested with no paused send queue");
            return false;
        }

        if let Some(scene) = self.queue.paused_scene.take() {
            if let Some(coordinator) = self.scenes.get_mut(&scene) {
                coordinator.resume();
            }
        }

        let remaining = self.queue.remaining();
        self.queue.status = QueueStatus::Draining;
        tracing::info!(remaining, "Send queue resumed");
        self.emit(NavigationEvent::QueueResumed { remaining });
        true
    }

    pub fn settle_queue(&mut self) -> bool {
        if self.queue.status != QueueStatus::Settling {
            return false;
        }
        self.queue.status = QueueStatus::Draining;
        true
    }

    /// Drop queued batches whose target scene was torn down from outside the
    /// queue. Returns true when a suspended queue was released and other
    /// batches are waiting.
    pub fn discard_orphaned(&mut self) -> bool {
        let scenes = &self.scenes;
        let (discarded, front) = self.queue.discard_where(|id| !scenes.contains_key(id));

        if discarded > 0 {
            tracing::warn!(discarded, "Discarded queued actions for torn down scene");
            self.emit(NavigationEvent::QueueCancelled { discarded });
        }

        if front && self.queue.status.is_suspended() {
            self.queue.status = QueueStatus::Idle;
            self.queue.paused_scene = None;
            return !self.queue.is_empty();
        }
        false
    }

    /// Apply one queued action. Returns false when draining should stop.
    pub fn step(&mut self, effects: &mut Vec<Effect>) -> bool {
        if self.queue.status != QueueStatus::Draining {
            return false;
        }

        let Some((target, action)) = self.queue.next() else {
            self.queue.status = QueueStatus::Idle;
            tracing::debug!("Send queue drained");
            self.emit(NavigationEvent::QueueDrained);
            return false;
        };

        let chain = self.ancestry(&target);
        if chain.is_empty() {
            let discarded = self.queue.discard_current() + 1;
            tracing::warn!(scene = %target, discarded, "Send target no longer exists");
            self.emit(NavigationEvent::QueueCancelled { discarded });
            return true;
        }

        let label = action.label();
        tracing::debug!(scene = %target, action = label, "Applying queued action");

        let applied = match self.apply(&target, action, effects) {
            Ok(applied) => applied,
            Err(e) => {
                log_skipped(&target, label, &e);
                Applied::default()
            }
        };

        let next_target = applied
            .next_target
            .filter(|id| self.contains(id))
            .or_else(|| chain.into_iter().find(|id| self.contains(id)))
            .unwrap_or_else(|| self.root.clone());
        self.queue.retarget(next_target.clone());

        let resume = applied
            .navigated
            .as_ref()
            .map(|d| d.receive_resume_type())
            .unwrap_or_default();

        match resume {
            ReceiveResumeType::Pause => {
                let remaining = self.queue.remaining();
                self.queue.status = QueueStatus::Paused;
                self.queue.paused_scene = Some(next_target.clone());
                if let Some(coordinator) = self.scenes.get_mut(&next_target) {
                    coordinator.pause();
                }
                tracing::info!(scene = %next_target, remaining, "Send queue paused");
                self.emit(NavigationEvent::QueuePaused {
                    scene: next_target,
                    remaining,
                });
                return false;
            }
            ReceiveResumeType::Cancel => {
                let discarded = self.queue.discard_current();
                if discarded > 0 {
                    tracing::info!(discarded, "Send sequence cancelled by destination");
                    self.emit(NavigationEvent::QueueCancelled { discarded });
                }
            }
            ReceiveResumeType::Auto | ReceiveResumeType::Immediately => {}
        }

        if applied.presentation_changed
            && self.config.settle_presentations
            && resume != ReceiveResumeType::Immediately
        {
            self.queue.status = QueueStatus::Settling;
            tracing::debug!(scene = %next_target, "Send queue waiting for presentation to settle");
            self.emit(NavigationEvent::QueueSettling { scene: next_target });
            return false;
        }

        true
    }

    fn apply(
        &mut self,
        target: &SceneId,
        action: NavigationAction,
        effects: &mut Vec<Effect>,
    ) -> Result<Applied> {
        let mut applied = Applied::default();

        match action {
            NavigationAction::SceneSwitch(tab) => {
                self.select_tab(&tab)?;
                applied.next_target = Some(tab);
            }
            NavigationAction::Pop(count) => {
                self.pop(target, count)?;
            }
            NavigationAction::PopAll { scene } => {
                let scene = scene.unwrap_or_else(|| target.clone());
                self.pop(&scene, PopCount::ToRoot)?;
            }
            NavigationAction::Dismiss => {
                if let Some(survivor) = self.dismiss(target)? {
                    applied.next_target = Some(survivor);
                    applied.presentation_changed = true;
                }
            }
            NavigationAction::DismissAny => {
                let chain = self.ancestry(target);
                if let Some(presenter) = self.dismiss_any(target)? {
                    // A modal found off the target's chain leaves the target alone
                    if chain.contains(&presenter) {
                        applied.next_target = Some(presenter);
                    }
                    applied.presentation_changed = true;
                }
            }
            NavigationAction::DismissAll => {
                applied.presentation_changed = self.dismiss_presented_views(target)?;
            }
            NavigationAction::ReturnToCheckpoint { checkpoint, value } => {
                let scenes_before = self.scenes.len();
                if let CheckpointOutcome::Returned { scene, .. } =
                    self.return_to_checkpoint(target, &checkpoint, value, effects)?
                {
                    applied.next_target = Some(scene);
                    applied.presentation_changed = self.scenes.len() < scenes_before;
                }
            }
            other => {
                let Some((destination, method)) = other
                    .destination()
                    .map(|(destination, method)| (destination.clone(), method))
                else {
                    return Ok(applied);
                };

                if let Navigated::Presented(child) =
                    self.navigate(target, destination.clone(), method)?
                {
                    applied.next_target = Some(child);
                    applied.presentation_changed = true;
                }
                applied.navigated = Some(destination);
            }
        }

        Ok(applied)
    }
}
