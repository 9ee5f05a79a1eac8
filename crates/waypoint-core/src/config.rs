//! Navigation configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use waypoint_storage::Database;

use crate::Result;

const CONFIG_SETTING: &str = "navigation_config";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Key under which snapshots are saved; `None` disables restoration
    pub restoration_key: Option<String>,
    /// Suspend the send queue after presentation changes until the renderer
    /// reports they settled
    pub settle_presentations: bool,
    /// Capacity of the event channel
    pub event_capacity: usize,
    /// Attach popovers without a source id to the most recently registered source
    pub auto_detect_popover_source: bool,
    /// Path to the restoration database
    pub database_path: PathBuf,
}

impl NavigationConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            restoration_key: None,
            settle_presentations: false,
            event_capacity: 256,
            auto_detect_popover_source: true,
            database_path: data_dir.join("navigation.db"),
        }
    }

    pub fn with_restoration_key(mut self, key: impl Into<String>) -> Self {
        self.restoration_key = Some(key.into());
        self
    }

    pub fn with_settling(mut self, settle: bool) -> Self {
        self.settle_presentations = settle;
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Persist this configuration as the override for later launches
    pub fn save_overrides(&self, db: &Database) -> Result<()> {
        db.set_setting(CONFIG_SETTING, &serde_json::to_string(self)?)?;
        tracing::debug!("Saved navigation config overrides");
        Ok(())
    }

    /// Replace this configuration with the stored override, if any. The
    /// database path always stays the one the database was opened from.
    pub fn merge_stored(self, db: &Database) -> Result<Self> {
        let Some(json) = db.get_setting(CONFIG_SETTING)? else {
            return Ok(self);
        };
        let stored = Self::from_json(&json)?;
        tracing::info!(
            restoration_key = ?stored.restoration_key,
            settle_presentations = stored.settle_presentations,
            "Loaded navigation config overrides"
        );
        Ok(Self {
            database_path: self.database_path,
            ..stored
        })
    }

    pub fn data_dir() -> PathBuf {
        platform_data_dir()
            .map(|d| d.join("Waypoint"))
            .unwrap_or_else(|| PathBuf::from(".waypoint"))
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

/// Per-user data directory: `LOCALAPPDATA`, `~/Library/Application Support`
/// or the XDG data home
fn platform_data_dir() -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "windows") {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home().map(|h| h.join("Library/Application Support"))
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home().map(|h| h.join(".local/share")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NavigationConfig::new(PathBuf::from("/tmp/waypoint"));
        assert!(config.restoration_key.is_none());
        assert!(!config.settle_presentations);
        assert!(config.auto_detect_popover_source);
        assert_eq!(config.database_path, PathBuf::from("/tmp/waypoint/navigation.db"));
    }

    #[test]
    fn test_partial_json() {
        let config =
            NavigationConfig::from_json(r#"{"restoration_key":"main","settle_presentations":true}"#)
                .unwrap();
        assert_eq!(config.restoration_key.as_deref(), Some("main"));
        assert!(config.settle_presentations);
        assert_eq!(config.event_capacity, 256);
    }

    #[test]
    fn test_stored_overrides() {
        let db = Database::open_in_memory().unwrap();
        let config = NavigationConfig::new(PathBuf::from("/tmp/waypoint"));
        let unchanged = config.clone().merge_stored(&db).unwrap();
        assert!(unchanged.restoration_key.is_none());

        NavigationConfig::new(PathBuf::from("/elsewhere"))
            .with_restoration_key("main")
            .with_settling(true)
            .save_overrides(&db)
            .unwrap();

        let merged = config.merge_stored(&db).unwrap();
        assert_eq!(merged.restoration_key.as_deref(), Some("main"));
        assert!(merged.settle_presentations);
        assert_eq!(merged.database_path, PathBuf::from("/tmp/waypoint/navigation.db"));
    }
}
