//! Presentation methods
//!
//! ```text
//! Push            append to the scene's path
//! Sheet / Cover   present modally, no stack of their own
//! Managed*        present modally inside a fresh navigation stack
//! Popover         anchor-relative presentation at a registered source
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum NavigationMethod {
    /// Push onto the current navigation stack
    #[default]
    Push,
    Sheet,
    /// Sheet wrapping its content in its own navigation stack
    ManagedSheet,
    Cover,
    /// Full screen cover wrapping its content in its own navigation stack
    ManagedCover,
    /// Popover anchored at a source; `None` attaches to the most recently
    /// registered source
    Popover { source_id: Option<String> },
    /// Popover with its own navigation stack
    ManagedPopover { source_id: Option<String> },
}

impl NavigationMethod {
    pub fn popover(source_id: impl Into<String>) -> Self {
        NavigationMethod::Popover {
            source_id: Some(source_id.into()),
        }
    }

    pub fn managed_popover(source_id: impl Into<String>) -> Self {
        NavigationMethod::ManagedPopover {
            source_id: Some(source_id.into()),
        }
    }

    /// Popover attached to whichever source registered last
    pub fn auto_popover() -> Self {
        NavigationMethod::Popover { source_id: None }
    }

    /// Managed variants host their content in a dedicated stack
    pub fn requires_navigation_stack(&self) -> bool {
        matches!(
            self,
            NavigationMethod::ManagedSheet
                | NavigationMethod::ManagedCover
                | NavigationMethod::ManagedPopover { .. }
        )
    }

    pub fn popover_source_id(&self) -> Option<&str> {
        match self {
            NavigationMethod::Popover { source_id }
            | NavigationMethod::ManagedPopover { source_id } => source_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_popover(&self) -> bool {
        matches!(
            self,
            NavigationMethod::Popover { .. } | NavigationMethod::ManagedPopover { .. }
        )
    }

    /// Everything except push creates a presented child scene
    pub fn is_presentation(&self) -> bool {
        !matches!(self, NavigationMethod::Push)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMethod::Push => "push",
            NavigationMethod::Sheet => "sheet",
            NavigationMethod::ManagedSheet => "managedSheet",
            NavigationMethod::Cover => "cover",
            NavigationMethod::ManagedCover => "managedCover",
            NavigationMethod::Popover { .. } => "popover",
            NavigationMethod::ManagedPopover { .. } => "managedPopover",
        }
    }
}

impl std::fmt::Display for NavigationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.popover_source_id() {
            Some(id) => write!(f, "{}({})", self.as_str(), id),
            None => write!(f, "{}", self.as_str()),
        }
    }
}
