//! Application state
use anyhow::Context;
use waypoint_core::{
    Database, Edge, NavigationConfig, Navigator, PopoverAnchor, PopoverRegistration,
    PopoverSource, SnapshotStore, UnitPoint,
};
use waypoint_links::NavigationUrlRouter;

use crate::destinations::{
    ExampleDestinations, HomeDestinations, PopoverDestinations, RootTabs, SettingsDestinations,
};
use crate::links;

pub struct AppState {
    navigator: Navigator,
    store: SnapshotStore,
    db: Database,
    router: NavigationUrlRouter,
    /// Popover anchors owned by the example screens, with the registration
    /// each one unregisters when it goes away
    anchors: Vec<(PopoverRegistration, PopoverSource)>,
}

impl AppState {
    pub fn new(config: NavigationConfig) -> anyhow::Result<Self> {
        let db = open_database(&config)?;
        Self::build(config, db)
    }

    /// Like `new`, but a configuration saved by an earlier run wins
    pub fn with_stored_config(config: NavigationConfig) -> anyhow::Result<Self> {
        let db = open_database(&config)?;
        let config = config
            .merge_stored(&db)
            .context("loading stored navigation config")?;
        Self::build(config, db)
    }

    fn build(config: NavigationConfig, db: Database) -> anyhow::Result<Self> {
        let navigator = Navigator::new(config);
        for tab in RootTabs::ALL {
            navigator
                .add_tab(tab.scene_id())
                .with_context(|| format!("mounting tab {}", tab.as_str()))?;
        }

        Ok(Self {
            navigator,
            store: SnapshotStore::new(db.clone()),
            db,
            router: links::router(),
            anchors: Vec::new(),
        })
    }

    /// Register destinations with their tabs and restore the last session
    pub fn initialize(&mut self) -> anyhow::Result<usize> {
        self.tab(RootTabs::Home).register::<HomeDestinations>();
        self.tab(RootTabs::Settings).register::<SettingsDestinations>();
        self.tab(RootTabs::Examples).register::<ExampleDestinations>();
        self.tab(RootTabs::Examples).register::<PopoverDestinations>();

        let registry = self.navigator.popover_registry();
        for (id, anchor, edge) in [
            ("filter", PopoverAnchor::Bounds, Edge::Bottom),
            ("help", PopoverAnchor::Point(UnitPoint::TOP), Edge::Top),
        ] {
            let source = PopoverSource::new(anchor, edge);
            let registration = registry.register(id, &source);
            self.anchors.push((registration, source));
        }

        let restored = self.navigator.restore_state(&self.store)?;
        Ok(restored)
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn tab(&self, tab: RootTabs) -> Navigator {
        self.navigator
            .named(tab.scene_id())
            .unwrap_or_else(|| self.navigator.root())
    }

    pub fn router(&self) -> &NavigationUrlRouter {
        &self.router
    }

    pub fn anchor(&self, id: &str) -> Option<&PopoverSource> {
        self.anchors
            .iter()
            .find(|(registration, _)| registration.id == id)
            .map(|(_, source)| source)
    }

    /// Unmount an anchor view: unregister it, then drop its binding
    pub fn remove_anchor(&mut self, id: &str) -> bool {
        let registry = self.navigator.popover_registry();
        let mut removed = false;
        self.anchors.retain(|(registration, _)| {
            if registration.id != id {
                return true;
            }
            removed |= registry.unregister_registration(registration);
            false
        });
        removed
    }

    /// Save the navigation state and the configuration it ran with
    pub fn save(&self) -> anyhow::Result<bool> {
        self.navigator
            .config()
            .save_overrides(&self.db)
            .context("saving navigation config")?;
        Ok(self.navigator.save_state(&self.store)?)
    }
}

fn open_database(config: &NavigationConfig) -> anyhow::Result<Database> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating data directory {}", parent.display()))?;
    }
    Database::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))
}
