//! Browser types — matching the extension API surface.

use serde::{Deserialize, Serialize};

/// Download identifier handed out by the host.
pub type DownloadId = u64;

/// A browser tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Tab {
    pub fn new(id: impl Into<String>, url: Option<&str>) -> Self {
        Self {
            id: id.into(),
            url: url.map(str::to_string),
            title: None,
        }
    }
}

/// Cookie in the shape the extension cookie API reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(rename = "hostOnly")]
    pub host_only: bool,
    pub path: String,
    pub secure: bool,
    #[serde(rename = "httpOnly")]
    pub http_only: bool,
    #[serde(rename = "sameSite")]
    pub same_site: String,
    pub session: bool,
    #[serde(skip_serializing_if = "Option::is_none", rename = "expirationDate")]
    pub expiration_date: Option<f64>,
}

/// What to do when the target filename already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    #[default]
    Uniquify,
    Overwrite,
    Prompt,
}

/// A download request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadOptions {
    pub url: String,
    pub filename: String,
    #[serde(rename = "saveAs")]
    pub save_as: bool,
    #[serde(rename = "conflictAction")]
    pub conflict_action: ConflictAction,
}
