//! Deep link handlers
//!
//! - `waypoint://home/page/<n>` opens page n on the home tab
//! - `waypoint://settings/page3` opens settings page 3
//! - `waypoint://settings/external` opens the external settings page
//! - `waypoint://settings/loading` presents the loading sheet, then settings page 3

use url::Url;
use waypoint_core::NavigationAction;
use waypoint_links::{segments, NavigationUrlHandler, NavigationUrlRouter};

use crate::destinations::{HomeDestinations, RootTabs, SettingsDestinations};

pub fn router() -> NavigationUrlRouter {
    NavigationUrlRouter::with_scheme("waypoint")
        .with_handler(HomeUrlHandler)
        .with_handler(SettingsUrlHandler)
}

/// Common prefix: clear modals, switch tab and reset its stack
fn reset_to(tab: RootTabs) -> Vec<NavigationAction> {
    vec![
        NavigationAction::DismissAll,
        NavigationAction::switch_to(tab.scene_id()),
        NavigationAction::pop_all(tab.scene_id()),
    ]
}

struct HomeUrlHandler;

impl NavigationUrlHandler for HomeUrlHandler {
    fn handle(&self, url: &Url) -> Option<Vec<NavigationAction>> {
        let parts = segments(url);
        let (first, rest) = parts.split_first()?;
        if first != RootTabs::Home.as_str() {
            return None;
        }

        let mut actions = reset_to(RootTabs::Home);
        match rest {
            [] => {}
            [page] if page == "page2" => actions.push(NavigationAction::push(HomeDestinations::Page2)),
            [page] if page == "page3" => actions.push(NavigationAction::push(HomeDestinations::Page3)),
            [page, n] if page == "page" => {
                let n = n.parse().ok()?;
                actions.push(NavigationAction::push(HomeDestinations::PageN(n)));
            }
            _ => return None,
        }
        Some(actions)
    }
}

struct SettingsUrlHandler;

impl NavigationUrlHandler for SettingsUrlHandler {
    fn handle(&self, url: &Url) -> Option<Vec<NavigationAction>> {
        let parts = segments(url);
        let (first, rest) = parts.split_first()?;
        if first != RootTabs::Settings.as_str() {
            return None;
        }

        let mut actions = reset_to(RootTabs::Settings);
        match rest.first().map(String::as_str) {
            None => {}
            Some("page2") => actions.push(NavigationAction::push(SettingsDestinations::Page2)),
            Some("page3") => actions.push(NavigationAction::push(SettingsDestinations::Page3)),
            Some("external") => actions.push(NavigationAction::push(SettingsDestinations::External)),
            Some("loading") => actions.extend([
                NavigationAction::from(SettingsDestinations::PresentLoading),
                NavigationAction::Dismiss,
                NavigationAction::push(SettingsDestinations::Page3),
            ]),
            Some(_) => return None,
        }
        Some(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes() {
        let router = router();
        assert_eq!(router.resolve("waypoint://home/page/88").unwrap().len(), 4);
        assert_eq!(router.resolve("waypoint://settings/loading").unwrap().len(), 6);
        assert!(router.resolve("waypoint://settings/unknown").is_err());
        assert!(router.resolve("waypoint://examples").is_err());
    }
}
