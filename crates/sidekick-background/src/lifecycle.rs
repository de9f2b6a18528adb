//! Lifecycle notifier: install, update and startup events.

use serde::Serialize;
use sidekick_core::{CoordinatorConfig, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "lowercase")]
pub enum LifecycleEvent {
    Install,
    Update { previous: String },
    Startup,
}

impl LifecycleEvent {
    /// Compare the recorded version with the running one.
    pub fn detect(config: &CoordinatorConfig, version: &str) -> Self {
        match config.installed_version.as_deref() {
            None => Self::Install,
            Some(v) if v != version => Self::Update {
                previous: v.to_string(),
            },
            Some(_) => Self::Startup,
        }
    }
}

/// Log the lifecycle event for `version` and record it in `config`.
pub fn notify(config: &mut CoordinatorConfig, version: &str) -> Result<LifecycleEvent> {
    let event = LifecycleEvent::detect(config, version);
    match &event {
        LifecycleEvent::Install => info!("Sidekick extension installed (v{})", version),
        LifecycleEvent::Update { previous } => {
            info!("Sidekick extension updated from v{} to v{}", previous, version)
        }
        LifecycleEvent::Startup => debug!("Sidekick v{} started", version),
    }

    if event != LifecycleEvent::Startup {
        config.installed_version = Some(version.to_string());
        config.save()?;
    }
    Ok(event)
}
