//! Sidekick Core — shared error type, configuration, data directories.

pub mod config;
pub mod error;

pub use config::{CoordinatorConfig, DataPaths, SidekickConfig};
pub use error::{Error, Result};
