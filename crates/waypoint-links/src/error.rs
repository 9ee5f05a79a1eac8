//! Link routing error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Invalid URL {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("No handler for URL: {0}")]
    Unhandled(String),
}
