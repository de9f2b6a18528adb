//! Cookie exporter — active tab's cookies to a downloaded JSON text file.

use std::sync::Arc;

use base64::Engine as _;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use sidekick_browser::{BrowserHost, ConflictAction, DownloadOptions};
use sidekick_core::{Error, Result};
use tracing::info;

pub const NO_ACTIVE_TAB: &str = "No active tab found";

/// Outcome of one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieExportResult {
    pub count: usize,
    pub filename: String,
}

pub struct CookieExporter {
    host: Arc<dyn BrowserHost>,
}

impl CookieExporter {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self { host }
    }

    /// Export the active tab's cookies. Browser errors propagate unchanged.
    pub async fn export(&self) -> Result<CookieExportResult> {
        let tab = self
            .host
            .active_tab()
            .await?
            .ok_or_else(|| Error::Precondition(NO_ACTIVE_TAB.into()))?;
        let url = tab
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Precondition(NO_ACTIVE_TAB.into()))?;

        let cookies = self.host.get_cookies(&url).await?;
        let json = serde_json::to_string_pretty(&cookies)?;

        let filename = export_filename(&hostname_of(&url)?, chrono::Utc::now().timestamp_millis());

        self.host
            .download(DownloadOptions {
                url: text_data_url(&json),
                filename: filename.clone(),
                save_as: true,
                conflict_action: ConflictAction::Uniquify,
            })
            .await?;

        info!("Exported {} cookies from {} as {}", cookies.len(), url, filename);

        Ok(CookieExportResult {
            count: cookies.len(),
            filename,
        })
    }
}

fn hostname_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| Error::Precondition(format!("Invalid URL {}: {}", url, e)))?;
    Ok(parsed.host_str().unwrap_or_default().to_string())
}

/// `cookies_<hostname>_<epoch-ms>.txt` with `:`, `/` and `\` replaced by `_`.
pub fn export_filename(hostname: &str, timestamp_ms: i64) -> String {
    let sanitized = hostname.replace([':', '/', '\\'], "_");
    format!("cookies_{}_{}.txt", sanitized, timestamp_ms)
}

/// Base64 data URL carrying `text` as UTF-8.
pub fn text_data_url(text: &str) -> String {
    format!(
        "data:text/plain;charset=utf-8;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(text.as_bytes())
    )
}
