//! Chat types matching the sidebar message surface.

use serde::{Deserialize, Serialize};

/// Chat turn sent by the content script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "apiBaseUrl")]
    pub api_base_url: String,
    pub message: String,
    /// `None` (absent or `null`) starts a new thread upstream.
    #[serde(rename = "threadId", default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub reset: bool,
}

/// Body posted to `/api/v1/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatServiceRequest<'a> {
    pub message: &'a str,
    /// Serialized as `null` when absent.
    pub thread_id: Option<&'a str>,
    pub reset: bool,
}

impl<'a> From<&'a ChatRequest> for ChatServiceRequest<'a> {
    fn from(req: &'a ChatRequest) -> Self {
        Self {
            message: &req.message,
            thread_id: req.thread_id.as_deref(),
            reset: req.reset,
        }
    }
}

/// Chat service reply, passed through unmodified.
pub type ChatResponse = serde_json::Value;
