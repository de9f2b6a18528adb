//! The browser runtime seam.

use async_trait::async_trait;
use sidekick_core::Result;

use crate::types::{Cookie, DownloadId, DownloadOptions, Tab};

/// Browser APIs used by the background coordinator.
///
/// Every call may suspend; implementations must be shareable across
/// concurrently running handlers.
#[async_trait]
pub trait BrowserHost: Send + Sync {
    /// The active tab of the current window, if any.
    async fn active_tab(&self) -> Result<Option<Tab>>;

    /// Look up a tab by id.
    async fn tab(&self, tab_id: &str) -> Result<Option<Tab>>;

    /// Deliver a message to the content script of a tab.
    ///
    /// Fails with `Error::Delivery` when no content script is listening.
    async fn send_message(&self, tab_id: &str, message: &serde_json::Value) -> Result<()>;

    /// All cookies visible to `url`.
    async fn get_cookies(&self, url: &str) -> Result<Vec<Cookie>>;

    /// Start a download and return its id.
    async fn download(&self, options: DownloadOptions) -> Result<DownloadId>;
}
