//! Shared application state.

use std::sync::Arc;

use sidekick_background::Coordinator;
use sidekick_core::SidekickConfig;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: SidekickConfig,
    pub coordinator: Coordinator,
}

impl AppState {
    pub fn new(config: SidekickConfig, coordinator: Coordinator) -> Arc<Self> {
        Arc::new(Self {
            config,
            coordinator,
        })
    }
}
