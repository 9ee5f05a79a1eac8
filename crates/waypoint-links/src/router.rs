//! Deep link router
//!
//! Parses incoming links, asks each handler in registration order and sends
//! the first sequence produced to a navigator.

use url::Url;
use waypoint_core::{NavigationAction, Navigator};

use crate::error::LinkError;
use crate::handler::NavigationUrlHandler;
use crate::Result;

#[derive(Default)]
pub struct NavigationUrlRouter {
    /// Only URLs with this scheme are routed; `None` accepts any scheme
    scheme: Option<String>,
    handlers: Vec<Box<dyn NavigationUrlHandler>>,
}

impl NavigationUrlRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into().to_lowercase()),
            handlers: Vec::new(),
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Add a handler after the existing ones
    pub fn register(&mut self, handler: impl NavigationUrlHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    pub fn with_handler(mut self, handler: impl NavigationUrlHandler + 'static) -> Self {
        self.register(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn parse(&self, input: &str) -> Result<Url> {
        let input = input.trim();
        let url = Url::parse(input).map_err(|e| LinkError::InvalidUrl {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(scheme) = &self.scheme {
            if url.scheme() != scheme {
                return Err(LinkError::UnsupportedScheme(url.scheme().to_string()));
            }
        }

        Ok(url)
    }

    /// Actions for `input` from the first handler that recognizes it
    pub fn resolve(&self, input: &str) -> Result<Vec<NavigationAction>> {
        let url = self.parse(input)?;

        self.handlers
            .iter()
            .find_map(|handler| handler.handle(&url))
            .ok_or_else(|| LinkError::Unhandled(url.to_string()))
    }

    /// Resolve `input` and send the actions from `navigator`. Returns the
    /// number of actions sent.
    pub fn open(&self, input: &str, navigator: &Navigator) -> Result<usize> {
        let actions = match self.resolve(input) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::warn!(url = %input, error = %e, "Unable to open link");
                return Err(e);
            }
        };

        let count = actions.len();
        tracing::info!(
            url = %input,
            scene = %navigator.scene_id(),
            actions = count,
            "Opening link"
        );
        navigator.send(actions);
        Ok(count)
    }
}
