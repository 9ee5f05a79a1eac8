//! Waypoint Links
//!
//! Deep link routing:
//! - handlers turn a URL into a sequence of navigation actions
//! - the router asks its handlers in order and sends the first sequence
//!   produced to a navigator

mod error;
mod handler;
mod router;

pub use error::LinkError;
pub use handler::{query_value, segments, NavigationUrlHandler};
pub use router::NavigationUrlRouter;

pub type Result<T> = std::result::Result<T, LinkError>;
