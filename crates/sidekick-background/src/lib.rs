//! Extension background coordinator.
//!
//! Three stateless handlers share one browser host:
//! - the action-click relay toggles the sidebar in the active tab,
//! - the message router answers `chat-request` and `export-cookies`,
//! - the lifecycle notifier logs install and update events.

pub mod coordinator;
pub mod cookies;
pub mod envelope;
pub mod lifecycle;
pub mod message;
pub mod relay;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::Coordinator;
pub use cookies::{CookieExportResult, CookieExporter};
pub use envelope::ResponseEnvelope;
pub use lifecycle::LifecycleEvent;
pub use message::{InboundMessage, OutboundMessage};
pub use relay::{ActionClickRelay, ClickOutcome};
pub use router::{Dispatch, MessageRouter};
