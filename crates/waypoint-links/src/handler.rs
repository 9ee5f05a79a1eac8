//! URL handlers

use url::Url;
use waypoint_core::NavigationAction;

/// Maps URLs an application understands onto navigation actions. Return
/// `None` to let the next handler try.
pub trait NavigationUrlHandler {
    fn handle(&self, url: &Url) -> Option<Vec<NavigationAction>>;
}

impl<F> NavigationUrlHandler for F
where
    F: Fn(&Url) -> Option<Vec<NavigationAction>>,
{
    fn handle(&self, url: &Url) -> Option<Vec<NavigationAction>> {
        self(url)
    }
}

/// Route components of a URL.
///
/// For app schemes the host is the first component
/// (`waypoint://home/page/88` gives `home`, `page`, `88`); for web URLs
/// only the path counts.
pub fn segments(url: &Url) -> Vec<String> {
    let mut parts = Vec::new();

    if !matches!(url.scheme(), "http" | "https") {
        if let Some(host) = url.host_str().filter(|h| !h.is_empty()) {
            parts.push(host.to_string());
        }
    }

    if let Some(path) = url.path_segments() {
        parts.extend(path.filter(|s| !s.is_empty()).map(str::to_string));
    }

    parts
}

pub fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() {
        let url = Url::parse("waypoint://home/page/88").unwrap();
        assert_eq!(segments(&url), vec!["home", "page", "88"]);

        let url = Url::parse("https://example.com/settings/sheet/").unwrap();
        assert_eq!(segments(&url), vec!["settings", "sheet"]);

        let url = Url::parse("waypoint://home").unwrap();
        assert_eq!(segments(&url), vec!["home"]);
    }

    #[test]
    fn test_query_value() {
        let url = Url::parse("waypoint://loading?id=42&name=a%20b").unwrap();
        assert_eq!(query_value(&url, "id").as_deref(), Some("42"));
        assert_eq!(query_value(&url, "name").as_deref(), Some("a b"));
        assert!(query_value(&url, "missing").is_none());
    }

    #[test]
    fn test_closure_handler() {
        let handler = |url: &Url| (url.scheme() == "waypoint").then(|| vec![NavigationAction::DismissAny]);
        let url = Url::parse("waypoint://anything").unwrap();
        assert_eq!(handler.handle(&url).map(|a| a.len()), Some(1));

        let url = Url::parse("https://example.com").unwrap();
        assert!(handler.handle(&url).is_none());
    }
}
