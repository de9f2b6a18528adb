//! Wires the handlers to one browser host.

use std::sync::Arc;

use sidekick_browser::BrowserHost;
use sidekick_chat::ChatProxy;
use sidekick_core::{CoordinatorConfig, Result};

use crate::cookies::CookieExporter;
use crate::lifecycle::{self, LifecycleEvent};
use crate::relay::ActionClickRelay;
use crate::router::MessageRouter;

/// The background coordinator: its collaborators plus the config they were built from.
pub struct Coordinator {
    pub config: CoordinatorConfig,
    pub relay: ActionClickRelay,
    pub router: MessageRouter,
    pub exporter: Arc<CookieExporter>,
}

impl Coordinator {
    pub fn new(host: Arc<dyn BrowserHost>, config: &CoordinatorConfig, chat: ChatProxy) -> Self {
        let exporter = Arc::new(CookieExporter::new(host.clone()));
        Self {
            relay: ActionClickRelay::new(host, config.restricted_schemes.clone()),
            router: MessageRouter::new(chat, exporter.clone()),
            exporter,
            config: config.clone(),
        }
    }

    /// Build the coordinator and fire the lifecycle event for `version`.
    pub fn start(
        host: Arc<dyn BrowserHost>,
        config: &mut CoordinatorConfig,
        version: &str,
    ) -> Result<(Self, LifecycleEvent)> {
        let event = lifecycle::notify(config, version)?;
        Ok((Self::new(host, config, ChatProxy::default()), event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::ClickOutcome;
    use crate::testing::MockHost;
    use sidekick_browser::Tab;

    #[tokio::test]
    async fn test_start_wires_handlers() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CoordinatorConfig::load(&dir.path().join("config.json"));
        config.restricted_schemes = vec!["https://internal.".into()];

        let host = Arc::new(MockHost::with_tabs(vec![Tab::new(
            "1",
            Some("https://internal.corp/x"),
        )]));
        let (coordinator, event) = Coordinator::start(host.clone(), &mut config, "0.1.0").unwrap();

        assert_eq!(event, LifecycleEvent::Install);
        assert_eq!(coordinator.config.installed_version.as_deref(), Some("0.1.0"));
        assert_eq!(coordinator.relay.on_clicked_tab(None).await, ClickOutcome::Restricted);
        assert!(host.sent.lock().is_empty());
    }
}
