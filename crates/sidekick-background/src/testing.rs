//! Recording browser host for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use sidekick_browser::{BrowserHost, Cookie, DownloadId, DownloadOptions, Tab};
use sidekick_core::{Error, Result};

#[derive(Default)]
pub struct MockHost {
    /// First entry is the active tab.
    pub tabs: Vec<Tab>,
    pub cookies: Vec<Cookie>,
    pub reject_send: bool,
    pub reject_cookies: Option<String>,
    pub reject_download: Option<String>,
    pub cookie_urls: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<(String, Value)>>,
    pub downloads: Mutex<Vec<DownloadOptions>>,
}

impl MockHost {
    pub fn with_tabs(tabs: Vec<Tab>) -> Self {
        Self {
            tabs,
            ..Default::default()
        }
    }
}

pub fn cookie(name: &str, value: &str) -> Cookie {
    Cookie {
        name: name.into(),
        value: value.into(),
        domain: ".b.com".into(),
        host_only: false,
        path: "/".into(),
        secure: true,
        http_only: false,
        same_site: "lax".into(),
        session: true,
        expiration_date: None,
    }
}

#[async_trait]
impl BrowserHost for MockHost {
    async fn active_tab(&self) -> Result<Option<Tab>> {
        Ok(self.tabs.first().cloned())
    }

    async fn tab(&self, tab_id: &str) -> Result<Option<Tab>> {
        Ok(self.tabs.iter().find(|t| t.id == tab_id).cloned())
    }

    async fn send_message(&self, tab_id: &str, message: &Value) -> Result<()> {
        self.sent.lock().push((tab_id.to_string(), message.clone()));
        if self.reject_send {
            return Err(Error::Delivery(
                "Could not establish connection. Receiving end does not exist.".into(),
            ));
        }
        Ok(())
    }

    async fn get_cookies(&self, url: &str) -> Result<Vec<Cookie>> {
        self.cookie_urls.lock().push(url.to_string());
        if let Some(reason) = &self.reject_cookies {
            return Err(Error::Browser(reason.clone()));
        }
        Ok(self.cookies.clone())
    }

    async fn download(&self, options: DownloadOptions) -> Result<DownloadId> {
        if let Some(reason) = &self.reject_download {
            return Err(Error::Browser(reason.clone()));
        }
        let mut downloads = self.downloads.lock();
        downloads.push(options);
        Ok(downloads.len() as DownloadId)
    }
}
