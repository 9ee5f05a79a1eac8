//! Popover source registry
//!
//! Views that can anchor a popover register themselves here when they mount
//! and unregister when they unmount. The registry only holds a weak reference
//! to each source's binding: the view owns it, and a binding whose view is
//! gone reads as "not registered".
//!
//! One registry is created per application and injected into every
//! navigation tree that needs it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::destination::AnyDestination;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    #[default]
    Top,
    Bottom,
    Leading,
    Trailing,
}

/// Point in unit coordinates of the anchor view's bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPoint {
    pub x: f32,
    pub y: f32,
}

impl UnitPoint {
    pub const CENTER: UnitPoint = UnitPoint { x: 0.5, y: 0.5 };
    pub const TOP: UnitPoint = UnitPoint { x: 0.5, y: 0.0 };
    pub const BOTTOM: UnitPoint = UnitPoint { x: 0.5, y: 1.0 };
    pub const LEADING: UnitPoint = UnitPoint { x: 0.0, y: 0.5 };
    pub const TRAILING: UnitPoint = UnitPoint { x: 1.0, y: 0.5 };
}

/// Where the popover attaches to its source view
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PopoverAnchor {
    /// The source view's bounds
    #[default]
    Bounds,
    Point(UnitPoint),
}

/// Two-way slot holding the destination currently shown at an anchor.
/// Owned by the anchor view; cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct PopoverBinding {
    slot: Rc<RefCell<Option<AnyDestination>>>,
}

impl PopoverBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<AnyDestination> {
        self.slot.borrow().clone()
    }

    pub fn set(&self, destination: Option<AnyDestination>) {
        *self.slot.borrow_mut() = destination;
    }

    pub fn is_presenting(&self) -> bool {
        self.slot.borrow().is_some()
    }

    fn downgrade(&self) -> Weak<RefCell<Option<AnyDestination>>> {
        Rc::downgrade(&self.slot)
    }
}

/// Anchor description supplied by the registering view
#[derive(Debug, Clone, Default)]
pub struct PopoverSource {
    pub anchor: PopoverAnchor,
    pub arrow_edge: Edge,
    pub binding: PopoverBinding,
}

impl PopoverSource {
    pub fn new(anchor: PopoverAnchor, arrow_edge: Edge) -> Self {
        Self {
            anchor,
            arrow_edge,
            binding: PopoverBinding::new(),
        }
    }
}

/// Proof of one registration, used for precise unregistration when a view
/// that re-registered under the same id unmounts late.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopoverRegistration {
    pub id: String,
    pub sequence: u64,
}

/// Live view of a registered source as returned by lookups
#[derive(Debug, Clone)]
pub struct RegisteredPopoverSource {
    pub id: String,
    pub anchor: PopoverAnchor,
    pub arrow_edge: Edge,
    pub sequence: u64,
    pub binding: PopoverBinding,
}

struct SourceEntry {
    anchor: PopoverAnchor,
    arrow_edge: Edge,
    sequence: u64,
    binding: Weak<RefCell<Option<AnyDestination>>>,
}

impl SourceEntry {
    fn resolve(&self, id: &str) -> Option<RegisteredPopoverSource> {
        let slot = self.binding.upgrade()?;
        Some(RegisteredPopoverSource {
            id: id.to_string(),
            anchor: self.anchor,
            arrow_edge: self.arrow_edge,
            sequence: self.sequence,
            binding: PopoverBinding { slot },
        })
    }
}

#[derive(Default)]
pub struct PopoverSourceRegistry {
    sources: Rc<RefCell<HashMap<String, SourceEntry>>>,
    next_sequence: Rc<Cell<u64>>,
}

impl PopoverSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source; an existing registration under the same id is replaced
    pub fn register(&self, id: impl Into<String>, source: &PopoverSource) -> PopoverRegistration {
        let id = id.into();
        let sequence = self.next_sequence.get() + 1;
        self.next_sequence.set(sequence);
        self.prune_dead();

        let replaced = self
            .sources
            .borrow_mut()
            .insert(
                id.clone(),
                SourceEntry {
                    anchor: source.anchor,
                    arrow_edge: source.arrow_edge,
                    sequence,
                    binding: source.binding.downgrade(),
                },
            )
            .is_some();

        tracing::debug!(source_id = %id, sequence, replaced, "Registered popover source");

        PopoverRegistration { id, sequence }
    }

    pub fn lookup(&self, id: &str) -> Option<RegisteredPopoverSource> {
        self.sources.borrow().get(id).and_then(|entry| entry.resolve(id))
    }

    /// Remove a source by id; unknown ids are ignored
    pub fn unregister(&self, id: &str) -> bool {
        let removed = self.sources.borrow_mut().remove(id).is_some();
        if removed {
            tracing::debug!(source_id = %id, "Unregistered popover source");
        }
        removed
    }

    /// Remove a source only if it is still the registration described by
    /// `registration`
    pub fn unregister_registration(&self, registration: &PopoverRegistration) -> bool {
        let mut sources = self.sources.borrow_mut();
        match sources.get(&registration.id) {
            Some(entry) if entry.sequence == registration.sequence => {
                sources.remove(&registration.id);
                tracing::debug!(source_id = %registration.id, "Unregistered popover source");
                true
            }
            _ => false,
        }
    }

    /// Resolve the source a popover should attach to: the explicit id if it
    /// is live, otherwise the most recently registered live source.
    pub fn resolve_target(&self, explicit_id: Option<&str>) -> Option<RegisteredPopoverSource> {
        match explicit_id {
            Some(id) => self.lookup(id),
            None => self.most_recent(),
        }
    }

    pub fn most_recent(&self) -> Option<RegisteredPopoverSource> {
        self.prune_dead();
        let sources = self.sources.borrow();
        let mut entries: Vec<_> = sources.iter().collect();
        entries.sort_by(|a, b| b.1.sequence.cmp(&a.1.sequence));
        entries
            .into_iter()
            .find_map(|(id, entry)| entry.resolve(id))
    }

    /// Show `destination` at source `id` and clear every other source.
    /// Returns false when the source is not registered.
    pub fn present(&self, id: &str, destination: AnyDestination) -> bool {
        let Some(target) = self.lookup(id) else {
            return false;
        };

        for other in self.live_sources() {
            if other.id != id && other.binding.is_presenting() {
                other.binding.set(None);
            }
        }
        target.binding.set(Some(destination));
        true
    }

    /// Clear whatever source `id` shows; unknown ids are ignored
    pub fn clear(&self, id: &str) -> bool {
        match self.lookup(id) {
            Some(source) => {
                source.binding.set(None);
                true
            }
            None => false,
        }
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sources.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sources.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.borrow().is_empty()
    }

    /// Remove all sources (application reset and tests)
    pub fn remove_all(&self) {
        self.sources.borrow_mut().clear();
    }

    /// Drop entries whose anchor view is gone without unregistering
    fn prune_dead(&self) -> usize {
        let mut sources = self.sources.borrow_mut();
        let before = sources.len();
        sources.retain(|_, entry| entry.binding.strong_count() > 0);

        let pruned = before - sources.len();
        if pruned > 0 {
            tracing::debug!(pruned, "Pruned dead popover sources");
        }
        pruned
    }

    fn live_sources(&self) -> Vec<RegisteredPopoverSource> {
        self.prune_dead();
        self.sources
            .borrow()
            .iter()
            .filter_map(|(id, entry)| entry.resolve(id))
            .collect()
    }
}

impl Clone for PopoverSourceRegistry {
    fn clone(&self) -> Self {
        Self {
            sources: Rc::clone(&self.sources),
            next_sequence: Rc::clone(&self.next_sequence),
        }
    }
}

impl std::fmt::Debug for PopoverSourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PopoverSourceRegistry")
            .field("sources", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::fixtures::PopoverDestinations;

    #[test]
    fn test_last_registration_wins() {
        let registry = PopoverSourceRegistry::new();
        let first = PopoverSource::new(PopoverAnchor::Bounds, Edge::Top);
        let second = PopoverSource::new(PopoverAnchor::Point(UnitPoint::CENTER), Edge::Leading);

        registry.register("A", &first);
        registry.register("A", &second);

        let found = registry.lookup("A").unwrap();
        assert_eq!(found.anchor, PopoverAnchor::Point(UnitPoint::CENTER));
        assert_eq!(found.arrow_edge, Edge::Leading);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent() {
        let registry = PopoverSourceRegistry::new();
        let source = PopoverSource::default();
        registry.register("help", &source);

        assert!(registry.unregister("help"));
        assert!(!registry.unregister("help"));
        assert!(!registry.unregister("never-registered"));
        assert!(registry.lookup("help").is_none());
    }

    #[test]
    fn test_stale_registration_keeps_replacement() {
        let registry = PopoverSourceRegistry::new();
        let old = PopoverSource::default();
        let new = PopoverSource::new(PopoverAnchor::Bounds, Edge::Bottom);

        let old_registration = registry.register("info", &old);
        registry.register("info", &new);

        // Old view unmounts after its replacement mounted
        assert!(!registry.unregister_registration(&old_registration));
        assert_eq!(registry.lookup("info").unwrap().arrow_edge, Edge::Bottom);
    }

    #[test]
    fn test_dropped_binding_is_not_found() {
        let registry = PopoverSourceRegistry::new();
        {
            let source = PopoverSource::default();
            registry.register("transient", &source);
            assert!(registry.lookup("transient").is_some());
        }
        assert!(registry.lookup("transient").is_none());
        assert!(registry.most_recent().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_dead_sources_do_not_accumulate() {
        let registry = PopoverSourceRegistry::new();
        for i in 0..100 {
            let source = PopoverSource::default();
            registry.register(format!("row-{i}"), &source);
        }
        assert_eq!(registry.len(), 1);

        let kept = PopoverSource::default();
        registry.register("toolbar", &kept);
        assert_eq!(registry.ids(), vec!["toolbar".to_string()]);
        assert_eq!(registry.resolve_target(None).unwrap().id, "toolbar");
    }

    #[test]
    fn test_auto_detect_most_recent() {
        let registry = PopoverSourceRegistry::new();
        let first = PopoverSource::new(PopoverAnchor::Bounds, Edge::Trailing);
        let second = PopoverSource::new(PopoverAnchor::Bounds, Edge::Leading);

        registry.register("first-button", &first);
        registry.register("second-button", &second);
        assert_eq!(registry.resolve_target(None).unwrap().id, "second-button");
        assert_eq!(
            registry.resolve_target(Some("first-button")).unwrap().id,
            "first-button"
        );

        registry.unregister("second-button");
        assert_eq!(registry.resolve_target(None).unwrap().id, "first-button");
        assert!(registry.resolve_target(Some("missing")).is_none());
    }

    #[test]
    fn test_present_routes_to_single_source() {
        let registry = PopoverSourceRegistry::new();
        let help = PopoverSource::default();
        let info = PopoverSource::default();
        registry.register("help", &help);
        registry.register("info", &info);

        let destination = AnyDestination::new(PopoverDestinations::Help);
        assert!(registry.present("help", destination.clone()));
        assert_eq!(help.binding.get(), Some(destination));
        assert!(!info.binding.is_presenting());

        assert!(registry.present("info", AnyDestination::new(PopoverDestinations::FilterOptions)));
        assert!(!help.binding.is_presenting());
        assert!(info.binding.is_presenting());

        assert!(registry.clear("info"));
        assert!(!info.binding.is_presenting());
        assert!(!registry.present("missing", AnyDestination::new(PopoverDestinations::Help)));
    }
}
