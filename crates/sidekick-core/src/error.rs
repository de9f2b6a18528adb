//! Error types for Sidekick.
//!
//! The message-carrying variants display as the bare message: the router
//! copies `to_string()` into failure envelopes and callers match on the text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required input (active tab, tab URL) was missing.
    #[error("{0}")]
    Precondition(String),

    /// The chat service answered with a non-2xx status.
    #[error("{0}")]
    Upstream(String),

    /// A browser API call (tabs, cookies, downloads) was rejected.
    #[error("{0}")]
    Browser(String),

    /// The content script could not be reached.
    #[error("{0}")]
    Delivery(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
