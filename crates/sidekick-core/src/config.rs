//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 3017;
pub const DEFAULT_CDP_URL: &str = "http://127.0.0.1:9222";

/// Paths to all Sidekick data directories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Saved downloads (`data/downloads/`).
    pub downloads: PathBuf,
    /// Coordinator configuration (`data/config.json`).
    pub config_file: PathBuf,
}

impl DataPaths {
    /// Create data paths from a root directory. Creates directories if needed.
    pub fn new(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let paths = Self {
            downloads: root.join("downloads"),
            config_file: root.join("config.json"),
            root,
        };
        std::fs::create_dir_all(&paths.downloads)?;
        Ok(paths)
    }
}

/// Process-level configuration, read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidekickConfig {
    /// Relay HTTP port.
    pub port: u16,
    /// DevTools HTTP endpoint of the controlled browser.
    pub cdp_url: String,
    /// Data directory paths.
    pub data_paths: DataPaths,
}

impl SidekickConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let cdp_url = std::env::var("SIDEKICK_CDP_URL")
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CDP_URL.to_string());

        Ok(Self {
            port,
            cdp_url: cdp_url.trim_end_matches('/').to_string(),
            data_paths: DataPaths::new(data_dir)?,
        })
    }
}

/// Persisted coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// URL prefixes of pages that cannot host a content script.
    #[serde(default = "default_restricted_schemes")]
    pub restricted_schemes: Vec<String>,
    /// Origins allowed to call the relay. An entry ending in `://` matches
    /// every origin with that scheme; any other entry must match exactly.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Version recorded by the last lifecycle event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_version: Option<String>,
    /// Path to config file (not serialized).
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_restricted_schemes() -> Vec<String> {
    ["chrome://", "chrome-extension://", "edge://", "about:", "devtools://"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["chrome-extension://".to_string()]
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            restricted_schemes: default_restricted_schemes(),
            allowed_origins: default_allowed_origins(),
            installed_version: None,
            config_path: PathBuf::new(),
        }
    }
}

impl CoordinatorConfig {
    /// Load config from a JSON file, or return defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: CoordinatorConfig = match std::fs::read_to_string(config_path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!("Ignoring invalid {}: {}", config_path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        config.config_path = config_path.to_path_buf();
        config
    }

    /// Save config to disk.
    pub fn save(&self) -> crate::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        Ok(())
    }

    /// Whether a request carrying `Origin: origin` may use the relay.
    pub fn is_allowed_origin(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|allowed| {
            if allowed.ends_with("://") {
                origin.starts_with(allowed.as_str()) && origin.len() > allowed.len()
            } else {
                origin == allowed.as_str()
            }
        })
    }
}
