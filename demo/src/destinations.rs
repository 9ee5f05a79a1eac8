//! Demo destinations, one enum per feature area

use serde::{Deserialize, Serialize};
use waypoint_core::{Body, NavigationCheckpoint, NavigationDestination, NavigationMethod, ReceiveResumeType, SceneId};

pub const HOME_CHECKPOINT: NavigationCheckpoint = NavigationCheckpoint::named("home");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootTabs {
    Home,
    Settings,
    Examples,
}

impl RootTabs {
    pub const ALL: [RootTabs; 3] = [RootTabs::Home, RootTabs::Settings, RootTabs::Examples];

    pub fn scene_id(&self) -> SceneId {
        SceneId::new(self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RootTabs::Home => "home",
            RootTabs::Settings => "settings",
            RootTabs::Examples => "examples",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomeDestinations {
    Page2,
    Page3,
    PageN(i32),
    Presented1,
    Presented2,
}

impl NavigationDestination for HomeDestinations {
    fn body(&self) -> Body {
        match self {
            HomeDestinations::Page2 => Body::new("HomePage2View"),
            HomeDestinations::Page3 => Body::new("HomePage3View"),
            HomeDestinations::PageN(n) => Body::new("HomePageNView").titled(format!("Page {n}")),
            HomeDestinations::Presented1 => Body::new("HomePage2View").titled("Presented"),
            HomeDestinations::Presented2 => Body::new("HomePage3View").titled("Presented"),
        }
    }

    fn method(&self) -> NavigationMethod {
        match self {
            HomeDestinations::Presented1 => NavigationMethod::ManagedSheet,
            HomeDestinations::Presented2 => NavigationMethod::Sheet,
            _ => NavigationMethod::Push,
        }
    }

    fn type_key() -> &'static str {
        "home"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsDestinations {
    Page2,
    Page3,
    Sheet,
    External,
    PresentLoading,
}

impl NavigationDestination for SettingsDestinations {
    fn body(&self) -> Body {
        match self {
            SettingsDestinations::Page2 => Body::new("Page2SettingsView"),
            SettingsDestinations::Page3 => Body::new("Page3SettingsView"),
            SettingsDestinations::Sheet => Body::new("SettingsSheetView"),
            SettingsDestinations::External => Body::new("SettingsExternalView"),
            SettingsDestinations::PresentLoading => Body::new("PresentLoadingView"),
        }
    }

    fn method(&self) -> NavigationMethod {
        match self {
            SettingsDestinations::PresentLoading | SettingsDestinations::Sheet => NavigationMethod::Sheet,
            _ => NavigationMethod::Push,
        }
    }

    // Sending stops after the loading view appears until it finishes
    fn receive_resume_type(&self) -> ReceiveResumeType {
        match self {
            SettingsDestinations::PresentLoading => ReceiveResumeType::Pause,
            _ => ReceiveResumeType::Auto,
        }
    }

    fn type_key() -> &'static str {
        "settings"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExampleDestinations {
    Binding,
    Callback,
    Transition,
    Popover,
}

impl ExampleDestinations {
    pub fn description(&self) -> &'static str {
        match self {
            ExampleDestinations::Binding => "Using a binding in navigation destinations.",
            ExampleDestinations::Callback => "Callback handlers and checkpoints in navigation destinations.",
            ExampleDestinations::Transition => "Custom transitions with navigation destinations.",
            ExampleDestinations::Popover => "Popover navigation with various attachment strategies.",
        }
    }
}

impl NavigationDestination for ExampleDestinations {
    fn body(&self) -> Body {
        let title = format!("{self:?}");
        Body::new(format!("{title}ExampleView")).titled(title)
    }

    fn method(&self) -> NavigationMethod {
        NavigationMethod::ManagedCover
    }

    fn type_key() -> &'static str {
        "examples"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PopoverDestinations {
    FilterOptions,
    Help,
    Settings,
    Info,
    AutoDetect,
}

impl NavigationDestination for PopoverDestinations {
    fn body(&self) -> Body {
        let view = match self {
            PopoverDestinations::FilterOptions => "FilterOptionsView",
            PopoverDestinations::Help => "HelpView",
            PopoverDestinations::Settings => "QuickSettingsView",
            PopoverDestinations::Info => "InfoView",
            PopoverDestinations::AutoDetect => "AutoDetectView",
        };
        let title = match self {
            PopoverDestinations::FilterOptions => "Filter Options",
            PopoverDestinations::AutoDetect => "Auto Detect",
            PopoverDestinations::Help => "Help",
            PopoverDestinations::Settings => "Settings",
            PopoverDestinations::Info => "Info",
        };
        Body::new(view).titled(title)
    }

    fn method(&self) -> NavigationMethod {
        match self {
            PopoverDestinations::FilterOptions => NavigationMethod::popover("filter"),
            PopoverDestinations::Help => NavigationMethod::popover("help"),
            _ => NavigationMethod::auto_popover(),
        }
    }

    fn type_key() -> &'static str {
        "popovers"
    }
}

/// Never registered; navigating to it shows the configuration warning
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnregisteredDestinations {
    Page1,
    Page2,
}

impl NavigationDestination for UnregisteredDestinations {
    fn body(&self) -> Body {
        Body::new(format!("Text({self:?})"))
    }
}
