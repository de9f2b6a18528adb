//! Action-click relay: toolbar icon → `toggle-sidebar` in the clicked tab.

use std::sync::Arc;

use serde::Serialize;
use sidekick_browser::{BrowserHost, Tab};
use tracing::{info, warn};

use crate::message::OutboundMessage;

/// What a click ended in. Informational only; nothing here is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClickOutcome {
    /// The page cannot host a content script; nothing was sent.
    Restricted,
    Delivered,
    /// The content script did not answer; logged and dropped.
    DeliveryFailed,
    /// No tab to act on.
    NoTab,
}

pub struct ActionClickRelay {
    host: Arc<dyn BrowserHost>,
    restricted_schemes: Vec<String>,
}

impl ActionClickRelay {
    pub fn new(host: Arc<dyn BrowserHost>, restricted_schemes: Vec<String>) -> Self {
        Self {
            host,
            restricted_schemes,
        }
    }

    fn is_restricted(&self, url: &str) -> bool {
        self.restricted_schemes
            .iter()
            .any(|scheme| url.starts_with(scheme.as_str()))
    }

    /// Best-effort toggle. One send attempt, no retry.
    pub async fn on_clicked(&self, tab: &Tab) -> ClickOutcome {
        if let Some(url) = tab.url.as_deref() {
            if self.is_restricted(url) {
                info!("Sidebar unavailable on {}", url);
                return ClickOutcome::Restricted;
            }
        }

        let message = OutboundMessage::ToggleSidebar.to_value();
        match self.host.send_message(&tab.id, &message).await {
            Ok(()) => ClickOutcome::Delivered,
            Err(e) => {
                warn!("Content script not reachable in tab {}: {}", tab.id, e);
                ClickOutcome::DeliveryFailed
            }
        }
    }

    /// Click on a tab by id, or on the active tab when `tab_id` is `None`.
    pub async fn on_clicked_tab(&self, tab_id: Option<&str>) -> ClickOutcome {
        let lookup = match tab_id {
            Some(id) => self.host.tab(id).await,
            None => self.host.active_tab().await,
        };
        match lookup {
            Ok(Some(tab)) => self.on_clicked(&tab).await,
            Ok(None) => {
                info!("No tab to toggle the sidebar in");
                ClickOutcome::NoTab
            }
            Err(e) => {
                warn!("Tab lookup failed: {}", e);
                ClickOutcome::NoTab
            }
        }
    }
}
