//! Chat proxy for the sidebar.
//!
//! The content script cannot call the chat service cross-origin, so the
//! coordinator forwards each turn and hands back the service's JSON verbatim.

pub mod proxy;
pub mod types;

pub use proxy::ChatProxy;
pub use types::*;
