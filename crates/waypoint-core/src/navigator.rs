//! Navigator handle
//!
//! A `Navigator` is a cheap handle onto one scene of a shared navigation
//! tree. Handles for other scenes are obtained with [`Navigator::named`],
//! [`Navigator::parent`], [`Navigator::presented_navigator`] and friends.
//!
//! The tree is confined to the thread that created it. Operations never
//! panic on navigation mistakes; they log and report through their return
//! values.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tokio::sync::broadcast;

use crate::action::{NavigationAction, PopCount};
use crate::checkpoint::{
    CheckpointHandler, CheckpointOutcome, CheckpointRegistration, CheckpointValue,
    NavigationCheckpoint,
};
use crate::config::NavigationConfig;
use crate::coordinator::{Coordinator, SceneId, SceneKind};
use crate::destination::{AnyDestination, NavigationDestination};
use crate::event::NavigationEvent;
use crate::method::NavigationMethod;
use crate::popover::PopoverSourceRegistry;
use crate::queue::QueueStatus;
use crate::state::CoordinatorState;
use crate::tree::{log_skipped, Effect, NavigationTree};

/// An item currently presented by a scene
#[derive(Debug, Clone)]
pub struct PresentedItem {
    pub destination: AnyDestination,
    pub method: NavigationMethod,
    /// Scene hosting the presented item
    pub scene: SceneId,
    pub source_id: Option<String>,
}

#[derive(Clone)]
pub struct Navigator {
    tree: Rc<RefCell<NavigationTree>>,
    scene: SceneId,
}

impl Navigator {
    /// Create a navigation tree and return a handle to its root scene
    pub fn new(config: NavigationConfig) -> Self {
        Self::with_popover_registry(config, PopoverSourceRegistry::new())
    }

    /// Like [`Navigator::new`] with a popover registry shared with the
    /// rendering layer
    pub fn with_popover_registry(config: NavigationConfig, popovers: PopoverSourceRegistry) -> Self {
        tracing::info!(
            restoration_key = ?config.restoration_key,
            settle_presentations = config.settle_presentations,
            "Created navigation tree"
        );
        let tree = NavigationTree::new(config, popovers);
        let scene = tree.root.clone();
        Self {
            tree: Rc::new(RefCell::new(tree)),
            scene,
        }
    }

    pub(crate) fn tree(&self) -> &Rc<RefCell<NavigationTree>> {
        &self.tree
    }

    fn handle(&self, scene: SceneId) -> Navigator {
        Navigator {
            tree: Rc::clone(&self.tree),
            scene,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&Coordinator) -> T) -> Option<T> {
        let tree = self.tree.borrow();
        tree.scenes.get(&self.scene).map(f)
    }

    /// Run a mutation, then discard orphaned queue batches, run deferred
    /// handlers and restart the queue if it was released.
    fn with_tree<T>(&self, f: impl FnOnce(&mut NavigationTree, &mut Vec<Effect>) -> T) -> T {
        let mut effects = Vec::new();
        let (result, restart) = {
            let mut tree = self.tree.borrow_mut();
            let result = f(&mut tree, &mut effects);
            let restart = tree.discard_orphaned();
            (result, restart)
        };

        run_effects(effects);
        if restart {
            self.start_draining();
        }
        result
    }

    fn start_draining(&self) {
        let start = self.tree.borrow_mut().begin_drain();
        if start {
            self.drain();
        }
    }

    fn drain(&self) {
        loop {
            let mut effects = Vec::new();
            let more = self.tree.borrow_mut().step(&mut effects);
            run_effects(effects);
            if !more {
                break;
            }
        }
    }

    // Handles

    pub fn scene_id(&self) -> &SceneId {
        &self.scene
    }

    pub fn is_alive(&self) -> bool {
        self.tree.borrow().contains(&self.scene)
    }

    pub fn kind(&self) -> Option<SceneKind> {
        self.read(|c| c.kind.clone())
    }

    pub fn root(&self) -> Navigator {
        let root = self.tree.borrow().root.clone();
        self.handle(root)
    }

    pub fn parent(&self) -> Option<Navigator> {
        self.read(|c| c.parent.clone())
            .flatten()
            .map(|parent| self.handle(parent))
    }

    pub fn named(&self, scene: impl Into<SceneId>) -> Option<Navigator> {
        let scene = scene.into();
        let exists = self.tree.borrow().contains(&scene);
        exists.then(|| self.handle(scene))
    }

    pub fn presented_navigator(&self) -> Option<Navigator> {
        self.read(|c| c.presented.as_ref().map(|p| p.child.clone()))
            .flatten()
            .map(|child| self.handle(child))
    }

    pub fn popover_navigator(&self) -> Option<Navigator> {
        self.read(|c| c.popover.as_ref().map(|p| p.child.clone()))
            .flatten()
            .map(|child| self.handle(child))
    }

    // Registration

    /// Register destination type `D` with this scene's stack. Nested scenes
    /// inherit the registration.
    pub fn register<D: NavigationDestination>(&self) -> bool {
        match self.tree.borrow_mut().register::<D>(&self.scene) {
            Ok(()) => true,
            Err(e) => {
                log_skipped(&self.scene, "register", &e);
                false
            }
        }
    }

    pub fn popover_registry(&self) -> PopoverSourceRegistry {
        self.tree.borrow().popovers.clone()
    }

    // Tabs

    /// Add a tab scene under this container. The first tab is selected.
    pub fn add_tab(&self, tab: impl Into<SceneId>) -> Option<Navigator> {
        let tab = tab.into();
        let added = self.tree.borrow_mut().add_tab(&self.scene, tab.clone());
        match added {
            Ok(()) => Some(self.handle(tab)),
            Err(e) => {
                log_skipped(&self.scene, "add_tab", &e);
                None
            }
        }
    }

    /// Select `tab` in whichever container owns it
    pub fn select_tab(&self, tab: impl Into<SceneId>) -> bool {
        let tab = tab.into();
        self.with_tree(|tree, _| match tree.select_tab(&tab) {
            Ok(_) => true,
            Err(e) => {
                log_skipped(&tab, "select_tab", &e);
                false
            }
        })
    }

    pub fn selected_tab(&self) -> Option<SceneId> {
        self.read(|c| c.selected_tab.clone()).flatten()
    }

    pub fn current_tab(&self) -> Option<Navigator> {
        self.selected_tab().map(|tab| self.handle(tab))
    }

    pub fn tabs(&self) -> Vec<SceneId> {
        self.read(|c| c.tabs.clone()).unwrap_or_default()
    }

    // Stack

    /// Navigate using the destination's own method
    pub fn navigate<D: NavigationDestination>(&self, destination: D) -> bool {
        let method = destination.method();
        self.navigate_with(destination, method)
    }

    pub fn navigate_with<D: NavigationDestination>(&self, destination: D, method: NavigationMethod) -> bool {
        self.navigate_any(destination.into(), method)
    }

    pub fn navigate_any(&self, destination: AnyDestination, method: NavigationMethod) -> bool {
        self.with_tree(|tree, _| {
            match tree.navigate(&self.scene, destination, method) {
                Ok(_) => true,
                Err(e) => {
                    log_skipped(&self.scene, "navigate", &e);
                    false
                }
            }
        })
    }

    pub fn push<D: NavigationDestination>(&self, destination: D) -> bool {
        self.navigate_with(destination, NavigationMethod::Push)
    }

    /// Pop `count` screens, clamped to the root. Returns how many were popped.
    pub fn pop(&self, count: usize) -> usize {
        self.pop_scene(&self.scene, PopCount::Count(count))
    }

    pub fn pop_to_root(&self) -> usize {
        self.pop_scene(&self.scene, PopCount::ToRoot)
    }

    /// Pop `scene` to its root
    pub fn pop_all(&self, scene: impl Into<SceneId>) -> usize {
        self.pop_scene(&scene.into(), PopCount::ToRoot)
    }

    fn pop_scene(&self, scene: &SceneId, count: PopCount) -> usize {
        self.with_tree(|tree, _| match tree.pop(scene, count) {
            Ok(popped) => popped,
            Err(e) => {
                log_skipped(scene, "pop", &e);
                0
            }
        })
    }

    // Presentation

    /// Present `destination` and return a handle to its scene. Push is
    /// accepted and forwarded to the stack, returning `None`.
    pub fn present<D: NavigationDestination>(&self, destination: D, method: NavigationMethod) -> Option<Navigator> {
        if !method.is_presentation() {
            self.push(destination);
            return None;
        }

        let destination: AnyDestination = destination.into();
        let presented = self.with_tree(|tree, _| tree.present(&self.scene, destination, method));
        match presented {
            Ok(child) => Some(self.handle(child)),
            Err(e) => {
                log_skipped(&self.scene, "present", &e);
                None
            }
        }
    }

    pub fn present_sheet<D: NavigationDestination>(&self, destination: D) -> Option<Navigator> {
        self.present(destination, NavigationMethod::Sheet)
    }

    pub fn present_cover<D: NavigationDestination>(&self, destination: D) -> Option<Navigator> {
        self.present(destination, NavigationMethod::Cover)
    }

    /// Present a popover at `source_id`, or at the most recently registered
    /// source when `None`
    pub fn present_popover<D: NavigationDestination>(
        &self,
        destination: D,
        source_id: Option<&str>,
    ) -> Option<Navigator> {
        let method = NavigationMethod::Popover {
            source_id: source_id.map(str::to_string),
        };
        self.present(destination, method)
    }

    pub fn dismiss(&self) -> bool {
        self.with_tree(|tree, _| match tree.dismiss(&self.scene) {
            Ok(survivor) => survivor.is_some(),
            Err(e) => {
                log_skipped(&self.scene, "dismiss", &e);
                false
            }
        })
    }

    pub fn dismiss_any(&self) -> bool {
        self.with_tree(|tree, _| match tree.dismiss_any(&self.scene) {
            Ok(survivor) => survivor.is_some(),
            Err(e) => {
                log_skipped(&self.scene, "dismiss_any", &e);
                false
            }
        })
    }

    pub fn dismiss_presented_views(&self) -> bool {
        self.with_tree(|tree, _| match tree.dismiss_presented_views(&self.scene) {
            Ok(dismissed) => dismissed,
            Err(e) => {
                log_skipped(&self.scene, "dismiss_presented_views", &e);
                false
            }
        })
    }

    /// Tear down this scene and everything below it. The root cannot be
    /// unmounted.
    pub fn unmount(&self) -> bool {
        self.with_tree(|tree, _| match tree.unmount(&self.scene) {
            Ok(_) => true,
            Err(e) => {
                log_skipped(&self.scene, "unmount", &e);
                false
            }
        })
    }

    // Checkpoints

    /// Mark the current top of this scene's stack
    pub fn establish_checkpoint(&self, checkpoint: NavigationCheckpoint) -> Option<CheckpointRegistration> {
        self.establish(checkpoint, None)
    }

    /// Mark the current top of this scene's stack with a handler for values
    /// of type `T`. The handler runs on every matching return.
    pub fn establish_checkpoint_with<T: Any>(
        &self,
        checkpoint: NavigationCheckpoint,
        handler: impl Fn(&T) + 'static,
    ) -> Option<CheckpointRegistration> {
        self.establish(checkpoint, Some(CheckpointHandler::typed(handler)))
    }

    fn establish(
        &self,
        checkpoint: NavigationCheckpoint,
        handler: Option<CheckpointHandler>,
    ) -> Option<CheckpointRegistration> {
        let established = self
            .tree
            .borrow_mut()
            .establish_checkpoint(&self.scene, checkpoint, handler);
        match established {
            Ok(registration) => Some(registration),
            Err(e) => {
                log_skipped(&self.scene, "establish_checkpoint", &e);
                None
            }
        }
    }

    pub fn remove_checkpoint(&self, registration: &CheckpointRegistration) -> bool {
        self.tree.borrow_mut().checkpoints.remove(registration)
    }

    pub fn return_to_checkpoint(&self, checkpoint: &NavigationCheckpoint) -> CheckpointOutcome {
        self.return_with(checkpoint, None)
    }

    pub fn return_to_checkpoint_with<T: Any + Send + Sync>(
        &self,
        checkpoint: &NavigationCheckpoint,
        value: T,
    ) -> CheckpointOutcome {
        self.return_with(checkpoint, Some(CheckpointValue::new(value)))
    }

    fn return_with(&self, checkpoint: &NavigationCheckpoint, value: Option<CheckpointValue>) -> CheckpointOutcome {
        self.with_tree(|tree, effects| {
            match tree.return_to_checkpoint(&self.scene, checkpoint, value, effects) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log_skipped(&self.scene, "return_to_checkpoint", &e);
                    CheckpointOutcome::NotFound
                }
            }
        })
    }

    // Send queue

    /// Queue a sequence of actions against this scene. Drains immediately
    /// unless another sequence is in progress.
    pub fn send(&self, actions: impl IntoIterator<Item = NavigationAction>) {
        let actions: Vec<NavigationAction> = actions.into_iter().collect();
        {
            let mut tree = self.tree.borrow_mut();
            if !tree.contains(&self.scene) {
                tracing::warn!(scene = %self.scene, "Send from a scene that no longer exists");
                return;
            }
            tracing::info!(
                scene = %self.scene,
                count = actions.len(),
                status = ?tree.queue.status,
                "Queued navigation actions"
            );
            tree.queue.enqueue(self.scene.clone(), actions);
        }
        self.start_draining();
    }

    pub fn send_one(&self, action: impl Into<NavigationAction>) {
        self.send([action.into()]);
    }

    /// Continue a queue paused by a destination. No-op when nothing is paused.
    pub fn resume(&self) -> bool {
        let resumed = self.tree.borrow_mut().resume_queue();
        if resumed {
            self.drain();
        }
        resumed
    }

    /// Report that the last presentation change finished rendering
    pub fn presentation_settled(&self) -> bool {
        let settled = self.tree.borrow_mut().settle_queue();
        if settled {
            self.drain();
        }
        settled
    }

    pub fn queue_status(&self) -> QueueStatus {
        self.tree.borrow().queue.status
    }

    pub fn pending_actions(&self) -> usize {
        self.tree.borrow().queue.remaining()
    }

    /// Scene the next queued action will apply to
    pub fn queue_target(&self) -> Option<SceneId> {
        self.tree.borrow().queue.current_target().cloned()
    }

    /// Checkpoints currently established in this scene
    pub fn checkpoint_count(&self) -> usize {
        self.tree.borrow().checkpoints.count_in(&self.scene)
    }

    // Observable state

    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.tree.borrow().events().subscribe()
    }

    pub fn path(&self) -> Vec<AnyDestination> {
        self.read(|c| c.path.clone()).unwrap_or_default()
    }

    pub fn presented(&self) -> Option<PresentedItem> {
        self.read(|c| c.presented.as_ref().map(presented_item)).flatten()
    }

    pub fn popover(&self) -> Option<PresentedItem> {
        self.read(|c| c.popover.as_ref().map(presented_item)).flatten()
    }

    pub fn state(&self) -> CoordinatorState {
        self.read(|c| c.state).unwrap_or_default()
    }

    /// Every live scene id, sorted
    pub fn scenes(&self) -> Vec<SceneId> {
        let mut scenes: Vec<SceneId> = self.tree.borrow().scenes.keys().cloned().collect();
        scenes.sort();
        scenes
    }

    pub fn scene_count(&self) -> usize {
        self.tree.borrow().scenes.len()
    }

    pub fn config(&self) -> NavigationConfig {
        self.tree.borrow().config.clone()
    }
}

impl fmt::Debug for Navigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}

fn presented_item(presentation: &crate::coordinator::Presentation) -> PresentedItem {
    PresentedItem {
        destination: presentation.destination.clone(),
        method: presentation.method.clone(),
        scene: presentation.child.clone(),
        source_id: presentation.source_id.clone(),
    }
}

fn run_effects(effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Checkpoint { handlers, value } => {
                for handler in handlers {
                    handler.invoke(&value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::fixtures::*;
    use crate::popover::{Edge, PopoverAnchor, PopoverSource, UnitPoint};
    use std::path::PathBuf;

    const SETTINGS: NavigationCheckpoint = NavigationCheckpoint::named("settings");

    fn config() -> NavigationConfig {
        NavigationConfig::new(PathBuf::from("/tmp/waypoint-test"))
    }

    /// Root container with "home" and "settings" tabs
    fn tabbed(config: NavigationConfig) -> (Navigator, Navigator, Navigator) {
        let root = Navigator::new(config);
        let home = root.add_tab("home").unwrap();
        let settings = root.add_tab("settings").unwrap();
        home.register::<HomeDestinations>();
        settings.register::<SettingsDestinations>();
        (root, home, settings)
    }

    fn path_of<D: NavigationDestination>(navigator: &Navigator) -> Vec<D> {
        navigator
            .path()
            .iter()
            .filter_map(|d| d.downcast_ref::<D>().cloned())
            .collect()
    }

    fn drain_events(receiver: &mut broadcast::Receiver<NavigationEvent>) -> Vec<NavigationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_push_and_pop_clamped() {
        let (_, home, _) = tabbed(config());
        assert!(home.push(HomeDestinations::Page2));
        assert!(home.push(HomeDestinations::Page3));
        assert!(home.push(HomeDestinations::PageN(88)));
        assert_eq!(home.state(), CoordinatorState::Pushing);

        assert_eq!(home.pop(5), 3);
        assert!(home.path().is_empty());
        assert_eq!(home.state(), CoordinatorState::Idle);
        assert_eq!(home.pop(1), 0);
    }

    #[test]
    fn test_unregistered_push_skipped() {
        let (_, home, _) = tabbed(config());
        home.push(HomeDestinations::Page2);

        assert!(!home.push(LoadingDestinations::External));
        assert_eq!(path_of::<HomeDestinations>(&home), vec![HomeDestinations::Page2]);
        assert_eq!(home.path().len(), 1);
    }

    #[test]
    fn test_registration_inherited_by_presented_stack() {
        let (root, home, _) = tabbed(config());
        root.register::<LoadingDestinations>();

        let sheet = home.present(HomeDestinations::Presented1, NavigationMethod::ManagedSheet).unwrap();
        assert!(sheet.push(LoadingDestinations::Details("a".into())));
        assert!(sheet.push(HomeDestinations::Page2));
        assert_eq!(sheet.path().len(), 2);

        // Plain sheets have no stack of their own
        home.dismiss_presented_views();
        let plain = home.present_sheet(HomeDestinations::Presented2).unwrap();
        assert!(!plain.push(HomeDestinations::Page2));
    }

    #[test]
    fn test_navigate_uses_destination_method() {
        let (_, home, _) = tabbed(config());
        assert!(home.navigate(HomeDestinations::Presented1));

        let presented = home.presented().unwrap();
        assert_eq!(presented.method, NavigationMethod::ManagedSheet);
        assert_eq!(
            presented.destination.downcast_ref::<HomeDestinations>(),
            Some(&HomeDestinations::Presented1)
        );
        assert!(home.path().is_empty());
        assert_eq!(home.state(), CoordinatorState::Presenting);

        let sheet = home.presented_navigator().unwrap();
        assert_eq!(sheet.scene_id(), &presented.scene);
        assert_eq!(sheet.parent().unwrap().scene_id(), home.scene_id());
    }

    #[test]
    fn test_second_presentation_rejected() {
        let (_, home, _) = tabbed(config());
        assert!(home.present_sheet(HomeDestinations::Presented1).is_some());
        assert!(home.present_cover(HomeDestinations::Presented2).is_none());

        let presented = home.presented().unwrap();
        assert_eq!(presented.method, NavigationMethod::Sheet);
        assert_eq!(
            presented.destination.downcast_ref::<HomeDestinations>(),
            Some(&HomeDestinations::Presented1)
        );
    }

    #[test]
    fn test_dismiss_variants() {
        let (root, home, _) = tabbed(config());
        let sheet = home.present(HomeDestinations::Presented1, NavigationMethod::ManagedSheet).unwrap();
        let cover = sheet.present_cover(HomeDestinations::Presented2).unwrap();
        assert_eq!(root.scene_count(), 5);

        // A presented scene dismisses itself
        assert!(cover.dismiss());
        assert!(!cover.is_alive());
        assert!(sheet.presented().is_none());

        // dismiss_any walks outward and takes the subtree with it
        let cover = sheet.present_cover(HomeDestinations::Presented2).unwrap();
        assert!(cover.dismiss_any());
        assert!(!cover.is_alive());
        assert!(sheet.is_alive());

        sheet.present_cover(HomeDestinations::Presented2).unwrap();
        assert!(home.dismiss_presented_views());
        assert!(!sheet.is_alive());
        assert_eq!(root.scene_count(), 3);

        assert!(!home.dismiss());
        assert!(!home.dismiss_any());
    }

    #[test]
    fn test_dismiss_all_reaches_tabs() {
        let (root, home, settings) = tabbed(config());
        home.present_sheet(HomeDestinations::Presented2).unwrap();
        settings.present_cover(SettingsDestinations::Sheet).unwrap();

        root.send_one(NavigationAction::DismissAll);
        assert!(home.presented().is_none());
        assert!(settings.presented().is_none());
        assert_eq!(root.scene_count(), 3);
        assert!(!root.dismiss_presented_views());
    }

    #[test]
    fn test_tabs() {
        let (root, home, settings) = tabbed(config());
        assert_eq!(root.tabs(), vec![SceneId::new("home"), SceneId::new("settings")]);
        assert_eq!(root.selected_tab(), Some(SceneId::new("home")));

        assert!(settings.select_tab("settings"));
        assert_eq!(root.current_tab().unwrap().scene_id(), settings.scene_id());
        assert!(!root.select_tab("missing"));
        assert!(root.add_tab("home").is_some());
        assert!(home.add_tab("home").is_none());

        assert!(settings.unmount());
        assert_eq!(root.tabs(), vec![SceneId::new("home")]);
        assert_eq!(root.selected_tab(), Some(SceneId::new("home")));
        assert!(!root.unmount());
        assert!(root.named("settings").is_none());
    }

    #[test]
    fn test_return_to_checkpoint_with_value() {
        let (_, _, settings) = tabbed(config());
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        settings
            .establish_checkpoint_with(SETTINGS, move |value: &i32| sink.borrow_mut().push(*value))
            .unwrap();

        settings.push(SettingsDestinations::Page2);
        settings.push(SettingsDestinations::Page3);
        let sheet = settings.present_sheet(SettingsDestinations::Sheet).unwrap();

        let outcome = sheet.return_to_checkpoint_with(&SETTINGS, 5_i32);
        assert_eq!(
            outcome,
            CheckpointOutcome::Returned {
                scene: SceneId::new("settings"),
                position: 0,
                handlers_invoked: 1,
            }
        );
        assert_eq!(*received.borrow(), vec![5]);
        assert!(settings.path().is_empty());
        assert!(settings.presented().is_none());
        assert!(!sheet.is_alive());
    }

    #[test]
    fn test_return_with_mismatched_value_still_truncates() {
        let (_, _, settings) = tabbed(config());
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        settings.establish_checkpoint_with(SETTINGS, move |value: &i32| sink.borrow_mut().push(*value));

        settings.push(SettingsDestinations::Page2);
        let outcome = settings.return_to_checkpoint_with(&SETTINGS, 0.0_f64);

        assert!(outcome.is_found());
        assert!(received.borrow().is_empty());
        assert!(settings.path().is_empty());
    }

    #[test]
    fn test_checkpoint_handlers_are_reusable() {
        let (_, _, settings) = tabbed(config());
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&received);
        settings.push(SettingsDestinations::Page2);
        settings.establish_checkpoint_with(SETTINGS, move |value: &i32| sink.borrow_mut().push(*value));

        for value in [1, 2] {
            settings.push(SettingsDestinations::Page3);
            settings.return_to_checkpoint_with(&SETTINGS, value);
            assert_eq!(path_of::<SettingsDestinations>(&settings), vec![SettingsDestinations::Page2]);
        }
        assert_eq!(*received.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_checkpoint_nearest_and_pruned() {
        let (_, home, settings) = tabbed(config());
        settings.establish_checkpoint(SETTINGS);
        settings.push(SettingsDestinations::Page2);
        settings.establish_checkpoint(SETTINGS);
        settings.push(SettingsDestinations::Page3);

        let outcome = settings.return_to_checkpoint(&SETTINGS);
        assert_eq!(
            outcome,
            CheckpointOutcome::Returned {
                scene: SceneId::new("settings"),
                position: 1,
                handlers_invoked: 0,
            }
        );

        // Popping below a checkpoint prunes it
        assert_eq!(settings.checkpoint_count(), 2);
        settings.pop_to_root();
        assert_eq!(settings.checkpoint_count(), 1);
        settings.push(SettingsDestinations::Page3);
        settings.push(SettingsDestinations::Page3);
        settings.return_to_checkpoint(&SETTINGS);
        assert!(settings.path().is_empty());

        // Checkpoints in sibling tabs are not visible
        assert_eq!(home.return_to_checkpoint(&SETTINGS), CheckpointOutcome::NotFound);
    }

    #[test]
    fn test_handler_may_call_back_into_navigator() {
        let (_, _, settings) = tabbed(config());
        let nav = settings.clone();
        settings.establish_checkpoint_with(SETTINGS, move |_: &i32| {
            nav.push(SettingsDestinations::Page2);
        });

        settings.push(SettingsDestinations::Page3);
        settings.return_to_checkpoint_with(&SETTINGS, 1);
        assert_eq!(path_of::<SettingsDestinations>(&settings), vec![SettingsDestinations::Page2]);
    }

    #[test]
    fn test_nested_send_is_appended() {
        let (_, _, settings) = tabbed(config());
        let nav = settings.clone();
        settings.establish_checkpoint_with(SETTINGS, move |_: &i32| {
            nav.send_one(NavigationAction::push(SettingsDestinations::Page2));
        });

        settings.push(SettingsDestinations::Page2);
        settings.send([
            NavigationAction::return_to_checkpoint_with(SETTINGS, 1_i32),
            NavigationAction::push(SettingsDestinations::Page3),
        ]);

        assert_eq!(
            path_of::<SettingsDestinations>(&settings),
            vec![SettingsDestinations::Page3, SettingsDestinations::Page2]
        );
        assert_eq!(settings.queue_status(), QueueStatus::Idle);
    }

    #[test]
    fn test_send_sequence_across_tabs() {
        let (root, home, settings) = tabbed(config());
        root.select_tab("settings");
        home.push(HomeDestinations::Page3);
        let modal = settings.present_sheet(SettingsDestinations::Sheet).unwrap();
        let mut events = root.subscribe();

        modal.send([
            NavigationAction::DismissAny,
            NavigationAction::switch_to("home"),
            NavigationAction::pop_all("home"),
            NavigationAction::push(HomeDestinations::Page2),
            NavigationAction::push(HomeDestinations::PageN(88)),
            NavigationAction::present_sheet(HomeDestinations::Presented1),
        ]);

        assert!(!modal.is_alive());
        assert!(settings.presented().is_none());
        assert_eq!(root.selected_tab(), Some(SceneId::new("home")));
        assert_eq!(
            path_of::<HomeDestinations>(&home),
            vec![HomeDestinations::Page2, HomeDestinations::PageN(88)]
        );
        let presented = home.presented().unwrap();
        assert_eq!(presented.method, NavigationMethod::Sheet);
        assert_eq!(root.queue_status(), QueueStatus::Idle);

        let order: Vec<&'static str> = drain_events(&mut events)
            .iter()
            .map(|event| match event {
                NavigationEvent::Dismissed { .. } => "dismissed",
                NavigationEvent::TabSelected { .. } => "tab",
                NavigationEvent::PathChanged { .. } => "path",
                NavigationEvent::Presented { .. } => "presented",
                NavigationEvent::QueueDrained => "drained",
                _ => "other",
            })
            .collect();
        assert_eq!(
            order,
            vec!["dismissed", "tab", "path", "path", "path", "presented", "drained"]
        );
    }

    #[test]
    fn test_send_sequence_from_root() {
        let (root, home, settings) = tabbed(config());
        root.select_tab("settings");
        let modal = settings.present_sheet(SettingsDestinations::Sheet).unwrap();

        root.send([
            NavigationAction::DismissAny,
            NavigationAction::switch_to("home"),
            NavigationAction::pop_all("home"),
            NavigationAction::push(HomeDestinations::Page2),
            NavigationAction::push(HomeDestinations::PageN(88)),
            NavigationAction::present_sheet(HomeDestinations::Presented1),
        ]);

        assert!(!modal.is_alive());
        assert!(settings.presented().is_none());
        assert_eq!(root.selected_tab(), Some(SceneId::new("home")));
        assert_eq!(
            path_of::<HomeDestinations>(&home),
            vec![HomeDestinations::Page2, HomeDestinations::PageN(88)]
        );
        assert!(home.presented().is_some());
        assert_eq!(root.scene_count(), 4);
    }

    #[test]
    fn test_dismiss_any_from_sibling_tab() {
        let (root, home, settings) = tabbed(config());
        let modal = home.present_sheet(HomeDestinations::Presented2).unwrap();

        assert!(settings.dismiss_any());
        assert!(!modal.is_alive());
        assert!(home.presented().is_none());
        assert!(!settings.dismiss_any());
        assert_eq!(root.scene_count(), 3);
    }

    #[test]
    fn test_return_to_checkpoint_dismisses_tab_presentations() {
        let (root, home, _) = tabbed(config());
        root.register::<HomeDestinations>();
        root.establish_checkpoint(SETTINGS);
        root.push(HomeDestinations::Page2);
        let sheet = home.present_sheet(HomeDestinations::Presented1).unwrap();

        let outcome = sheet.return_to_checkpoint(&SETTINGS);
        assert_eq!(
            outcome,
            CheckpointOutcome::Returned {
                scene: root.scene_id().clone(),
                position: 0,
                handlers_invoked: 0,
            }
        );
        assert!(root.path().is_empty());
        assert!(!sheet.is_alive());
        assert!(home.presented().is_none());
    }

    #[test]
    fn test_pause_and_resume_once() {
        let (root, _, settings) = tabbed(config());
        root.register::<LoadingDestinations>();

        settings.send([
            NavigationAction::push(SettingsDestinations::Page2),
            NavigationAction::from(SettingsDestinations::PresentLoading),
            NavigationAction::push(LoadingDestinations::Details("a".into())),
            NavigationAction::push(LoadingDestinations::External),
        ]);

        assert_eq!(settings.queue_status(), QueueStatus::Paused);
        assert_eq!(settings.pending_actions(), 2);
        let loading = settings.presented_navigator().unwrap();
        assert_eq!(settings.queue_target().as_ref(), Some(loading.scene_id()));
        assert!(loading.path().is_empty());
        assert_eq!(loading.state(), CoordinatorState::Paused);

        assert!(settings.resume());
        assert_eq!(
            path_of::<LoadingDestinations>(&loading),
            vec![LoadingDestinations::Details("a".into()), LoadingDestinations::External]
        );
        assert_eq!(loading.state(), CoordinatorState::Pushing);
        assert_eq!(settings.queue_status(), QueueStatus::Idle);

        assert!(!settings.resume());
        assert_eq!(loading.path().len(), 2);
    }

    #[test]
    fn test_external_dismissal_discards_paused_sequence() {
        let (root, _, settings) = tabbed(config());
        root.register::<LoadingDestinations>();
        let mut events = root.subscribe();

        settings.send([
            NavigationAction::from(SettingsDestinations::PresentLoading),
            NavigationAction::push(LoadingDestinations::External),
        ]);
        assert_eq!(settings.queue_status(), QueueStatus::Paused);

        assert!(settings.dismiss_presented_views());
        assert_eq!(settings.queue_status(), QueueStatus::Idle);
        assert_eq!(settings.pending_actions(), 0);
        assert!(!settings.resume());
        assert!(drain_events(&mut events)
            .iter()
            .any(|e| matches!(e, NavigationEvent::QueueCancelled { discarded: 1 })));

        // Later sequences are unaffected
        settings.send_one(NavigationAction::push(SettingsDestinations::Page2));
        assert_eq!(settings.path().len(), 1);
    }

    #[test]
    fn test_cancel_discards_remainder() {
        let (_, _, settings) = tabbed(config());
        settings.send([
            NavigationAction::push(SettingsDestinations::Cancelling),
            NavigationAction::push(SettingsDestinations::Page2),
        ]);
        assert_eq!(
            path_of::<SettingsDestinations>(&settings),
            vec![SettingsDestinations::Cancelling]
        );
        assert_eq!(settings.queue_status(), QueueStatus::Idle);
    }

    #[test]
    fn test_settling_suspends_until_settled() {
        let (_, home, _) = tabbed(config().with_settling(true));
        home.send([
            NavigationAction::present_sheet(HomeDestinations::Presented2),
            NavigationAction::Dismiss,
            NavigationAction::push(HomeDestinations::Page2),
        ]);

        assert_eq!(home.queue_status(), QueueStatus::Settling);
        assert!(home.presented().is_some());
        assert!(!home.resume());

        assert!(home.presentation_settled());
        assert_eq!(home.queue_status(), QueueStatus::Settling);
        assert!(home.presented().is_none());
        assert!(home.path().is_empty());

        assert!(home.presentation_settled());
        assert_eq!(path_of::<HomeDestinations>(&home), vec![HomeDestinations::Page2]);
        assert_eq!(home.queue_status(), QueueStatus::Idle);
        assert!(!home.presentation_settled());
    }

    #[test]
    fn test_sends_run_in_submission_order() {
        let (_, home, _) = tabbed(config().with_settling(true));
        home.send_one(NavigationAction::present_sheet(HomeDestinations::Presented2));
        home.send_one(NavigationAction::push(HomeDestinations::Page2));
        assert_eq!(home.pending_actions(), 1);
        assert!(home.path().is_empty());

        home.presentation_settled();
        assert_eq!(path_of::<HomeDestinations>(&home), vec![HomeDestinations::Page2]);
    }

    #[test]
    fn test_popover_routed_to_source() {
        let registry = PopoverSourceRegistry::new();
        let (_, home, _) = tabbed_with(registry.clone());
        let filter = PopoverSource::new(PopoverAnchor::Point(UnitPoint::TOP), Edge::Top);
        let help = PopoverSource::new(PopoverAnchor::Point(UnitPoint::CENTER), Edge::Bottom);
        registry.register("filter", &filter);
        registry.register("help", &help);

        assert!(home.present_popover(PopoverDestinations::FilterOptions, Some("filter")).is_some());
        assert!(filter.binding.is_presenting());
        assert!(!help.binding.is_presenting());
        assert_eq!(home.popover().unwrap().source_id.as_deref(), Some("filter"));

        assert!(home.dismiss_presented_views());
        assert!(!filter.binding.is_presenting());
        assert!(home.popover().is_none());

        // Auto-detect picks the most recently registered source
        assert!(home.navigate(PopoverDestinations::AutoDetect));
        assert!(help.binding.is_presenting());
        assert!(!filter.binding.is_presenting());
    }

    #[test]
    fn test_popover_without_source_skipped() {
        let (_, home, _) = tabbed(config());
        assert!(!home.navigate(PopoverDestinations::Help));
        assert!(home.present_popover(PopoverDestinations::Help, Some("missing")).is_none());
        assert!(home.popover().is_none());
        assert_eq!(home.state(), CoordinatorState::Idle);
    }

    fn tabbed_with(registry: PopoverSourceRegistry) -> (Navigator, Navigator, Navigator) {
        let root = Navigator::with_popover_registry(config(), registry);
        let home = root.add_tab("home").unwrap();
        let settings = root.add_tab("settings").unwrap();
        home.register::<HomeDestinations>();
        settings.register::<SettingsDestinations>();
        (root, home, settings)
    }
}
