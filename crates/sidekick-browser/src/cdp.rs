//! DevTools-protocol browser host.
//!
//! Tabs come from the `/json/list` HTTP endpoint; messaging and cookie access
//! go over the per-page WebSocket. One short-lived connection per command.

use std::path::Path;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use sidekick_core::{Error, Result};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::downloads::DownloadWriter;
use crate::host::BrowserHost;
use crate::types::{Cookie, DownloadId, DownloadOptions, Tab};

/// Error text a sender sees when no content script is listening.
pub const NO_RECEIVER: &str = "Could not establish connection. Receiving end does not exist.";

/// Attribute the content script sets on `<html>` once its listener is installed.
pub const READY_ATTRIBUTE: &str = "data-sidekick-ready";

/// A DevTools target as listed by `/json/list`.
#[derive(Debug, Clone, Deserialize)]
struct CdpTarget {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    ws_url: Option<String>,
}

impl CdpTarget {
    fn to_tab(&self) -> Tab {
        Tab {
            id: self.id.clone(),
            url: (!self.url.is_empty()).then(|| self.url.clone()),
            title: (!self.title.is_empty()).then(|| self.title.clone()),
        }
    }
}

/// Cookie as reported by `Network.getCookies`.
#[derive(Debug, Clone, Deserialize)]
struct CdpCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
    #[serde(default)]
    expires: f64,
    #[serde(rename = "httpOnly", default)]
    http_only: bool,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    session: bool,
    #[serde(rename = "sameSite")]
    same_site: Option<String>,
}

impl From<CdpCookie> for Cookie {
    fn from(c: CdpCookie) -> Self {
        let same_site = match c.same_site.as_deref() {
            Some("Strict") => "strict",
            Some("Lax") => "lax",
            Some("None") => "no_restriction",
            _ => "unspecified",
        };
        Cookie {
            host_only: !c.domain.starts_with('.'),
            expiration_date: (!c.session && c.expires > 0.0).then_some(c.expires),
            name: c.name,
            value: c.value,
            domain: c.domain,
            path: c.path,
            secure: c.secure,
            http_only: c.http_only,
            same_site: same_site.to_string(),
            session: c.session,
        }
    }
}

/// Browser host backed by a Chromium DevTools endpoint.
pub struct CdpHost {
    client: Client,
    endpoint: String,
    downloads: DownloadWriter,
}

impl CdpHost {
    /// `endpoint` is the DevTools HTTP base, e.g. `http://127.0.0.1:9222`.
    pub fn new(endpoint: &str, download_dir: &Path) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            downloads: DownloadWriter::new(download_dir),
        }
    }

    /// Page targets, most recently activated first.
    async fn pages(&self) -> Result<Vec<CdpTarget>> {
        let url = format!("{}/json/list", self.endpoint);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Browser(format!("DevTools endpoint unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Browser(format!(
                "DevTools endpoint returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let targets: Vec<CdpTarget> = response
            .json()
            .await
            .map_err(|e| Error::Browser(format!("Invalid target list: {}", e)))?;

        Ok(targets.into_iter().filter(|t| t.kind == "page").collect())
    }

    async fn page(&self, tab_id: &str) -> Result<Option<CdpTarget>> {
        Ok(self.pages().await?.into_iter().find(|t| t.id == tab_id))
    }

    /// Send one command over a target's WebSocket and wait for its reply.
    async fn call(&self, ws_url: &str, method: &str, params: Value) -> Result<Value> {
        const ID: u64 = 1;

        let (mut ws, _) = connect_async(ws_url)
            .await
            .map_err(|e| Error::Browser(format!("DevTools connection failed: {}", e)))?;

        let command = json!({ "id": ID, "method": method, "params": params });
        debug!("CDP -> {} {}", method, ws_url);
        ws.send(Message::Text(command.to_string()))
            .await
            .map_err(|e| Error::Browser(format!("DevTools send failed: {}", e)))?;

        while let Some(frame) = ws.next().await {
            let frame = frame.map_err(|e| Error::Browser(format!("DevTools read failed: {}", e)))?;
            let Message::Text(text) = frame else {
                continue;
            };
            let reply: Value = serde_json::from_str(&text)?;
            // Events carry no id; skip them.
            if reply.get("id").and_then(Value::as_u64) != Some(ID) {
                continue;
            }
            let _ = ws.close(None).await;

            if let Some(err) = reply.get("error") {
                let message = err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown DevTools error");
                return Err(Error::Browser(format!("{} failed: {}", method, message)));
            }
            return Ok(reply.get("result").cloned().unwrap_or(Value::Null));
        }

        Err(Error::Browser(format!(
            "DevTools connection closed before {} replied",
            method
        )))
    }
}

/// Page expression that hands `message` to the content script, or throws when
/// the content script has not announced itself.
fn delivery_expression(message: &Value) -> String {
    format!(
        "(() => {{ \
           if (!document.documentElement.hasAttribute('{attr}')) {{ throw new Error('{err}'); }} \
           window.postMessage({{ source: 'sidekick-background', payload: {msg} }}, '*'); \
           return true; \
         }})()",
        attr = READY_ATTRIBUTE,
        err = NO_RECEIVER,
        msg = message,
    )
}

#[async_trait]
impl BrowserHost for CdpHost {
    async fn active_tab(&self) -> Result<Option<Tab>> {
        Ok(self.pages().await?.first().map(CdpTarget::to_tab))
    }

    async fn tab(&self, tab_id: &str) -> Result<Option<Tab>> {
        Ok(self.page(tab_id).await?.map(|t| t.to_tab()))
    }

    async fn send_message(&self, tab_id: &str, message: &Value) -> Result<()> {
        let target = self
            .page(tab_id)
            .await
            .map_err(|e| Error::Delivery(e.to_string()))?
            .ok_or_else(|| Error::Delivery(NO_RECEIVER.into()))?;
        let ws_url = target
            .ws_url
            .ok_or_else(|| Error::Delivery(NO_RECEIVER.into()))?;

        let result = self
            .call(
                &ws_url,
                "Runtime.evaluate",
                json!({ "expression": delivery_expression(message), "returnByValue": true }),
            )
            .await
            .map_err(|e| Error::Delivery(e.to_string()))?;

        if let Some(details) = result.get("exceptionDetails") {
            let text = details
                .pointer("/exception/description")
                .or_else(|| details.get("text"))
                .and_then(Value::as_str)
                .unwrap_or(NO_RECEIVER);
            // "Error: <message>\n    at ..." -> "<message>"
            let text = text.lines().next().unwrap_or(text);
            let text = text.strip_prefix("Error: ").unwrap_or(text);
            return Err(Error::Delivery(text.to_string()));
        }
        Ok(())
    }

    async fn get_cookies(&self, url: &str) -> Result<Vec<Cookie>> {
        let pages = self.pages().await?;
        let ws_url = pages
            .iter()
            .find_map(|t| t.ws_url.clone())
            .ok_or_else(|| Error::Browser("No page target available for cookie access".into()))?;

        let result = self
            .call(&ws_url, "Network.getCookies", json!({ "urls": [url] }))
            .await?;

        let cookies: Vec<CdpCookie> = match result.get("cookies") {
            Some(list) => serde_json::from_value(list.clone())?,
            None => {
                warn!("Network.getCookies returned no cookie list");
                Vec::new()
            }
        };
        Ok(cookies.into_iter().map(Cookie::from).collect())
    }

    async fn download(&self, options: DownloadOptions) -> Result<DownloadId> {
        self.downloads.save(&options).map(|saved| saved.id)
    }
}
