//! Message router: `chat-request` and `export-cookies` with deferred replies.
//!
//! Each routed message runs as its own task and answers on a oneshot channel.
//! Tasks share nothing mutable, so one failing never affects another.

use std::sync::Arc;

use serde_json::Value;
use sidekick_chat::ChatProxy;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::cookies::CookieExporter;
use crate::envelope::ResponseEnvelope;
use crate::message::{action_of, InboundMessage};

/// Result of handing a message to the router.
#[derive(Debug)]
pub enum Dispatch {
    /// The reply arrives later on this channel.
    Deferred(oneshot::Receiver<ResponseEnvelope>),
    /// No handler matched; the router will never reply.
    Unhandled { action: Option<String> },
}

pub struct MessageRouter {
    chat: ChatProxy,
    exporter: Arc<CookieExporter>,
}

impl MessageRouter {
    pub fn new(chat: ChatProxy, exporter: Arc<CookieExporter>) -> Self {
        Self { chat, exporter }
    }

    /// Route a raw message. Must be called from within a Tokio runtime.
    pub fn dispatch(&self, raw: &Value) -> Dispatch {
        let (tx, rx) = oneshot::channel();

        let message = match InboundMessage::from_value(raw) {
            Ok(Some(message)) => message,
            Ok(None) => {
                let action = action_of(raw).map(str::to_string);
                debug!("No handler for action {:?}", action);
                return Dispatch::Unhandled { action };
            }
            Err(e) => {
                warn!("Malformed {:?} message: {}", action_of(raw), e);
                let _ = tx.send(ResponseEnvelope::err(e.to_string()));
                return Dispatch::Deferred(rx);
            }
        };

        let chat = self.chat.clone();
        let exporter = self.exporter.clone();
        tokio::spawn(async move {
            let envelope = match message {
                InboundMessage::ChatRequest { data } => {
                    ResponseEnvelope::from_result(chat.send(&data).await)
                }
                InboundMessage::ExportCookies => ResponseEnvelope::from_result(
                    exporter
                        .export()
                        .await
                        .and_then(|result| Ok(serde_json::to_value(result)?)),
                ),
            };
            if let Some(error) = &envelope.error {
                warn!("Message handler failed: {}", error);
            }
            if tx.send(envelope).is_err() {
                debug!("Sender went away before the reply was ready");
            }
        });

        Dispatch::Deferred(rx)
    }

    /// Route a message and wait for its reply. `None` when unhandled.
    pub async fn handle(&self, raw: &Value) -> Option<ResponseEnvelope> {
        match self.dispatch(raw) {
            Dispatch::Deferred(rx) => Some(
                rx.await
                    .unwrap_or_else(|_| ResponseEnvelope::err("Message handler stopped before replying")),
            ),
            Dispatch::Unhandled { .. } => None,
        }
    }
}
