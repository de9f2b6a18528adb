//! Browser host — the extension runtime surface the coordinator talks to.
//!
//! `BrowserHost` covers tabs, content-script messaging, the cookie store and
//! downloads. `CdpHost` implements it against a Chromium instance through the
//! DevTools protocol; downloads land in a local directory.

pub mod cdp;
pub mod downloads;
pub mod host;
pub mod types;

pub use cdp::CdpHost;
pub use downloads::DownloadWriter;
pub use host::BrowserHost;
pub use types::*;
