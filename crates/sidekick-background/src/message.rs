//! Messages exchanged with the content script.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sidekick_chat::ChatRequest;
use sidekick_core::Result;

/// Messages the router answers, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum InboundMessage {
    ChatRequest { data: ChatRequest },
    ExportCookies,
}

impl InboundMessage {
    pub const ACTIONS: &'static [&'static str] = &["chat-request", "export-cookies"];

    /// Parse a raw message.
    ///
    /// `Ok(None)` for an action the router does not handle; `Err` when the
    /// action is known but its payload is malformed.
    pub fn from_value(raw: &Value) -> Result<Option<Self>> {
        match action_of(raw) {
            Some(action) if Self::ACTIONS.contains(&action) => {
                Ok(Some(serde_json::from_value(raw.clone())?))
            }
            _ => Ok(None),
        }
    }
}

/// The `action` field of a raw message, if it is a string.
pub fn action_of(raw: &Value) -> Option<&str> {
    raw.get("action").and_then(Value::as_str)
}

/// Messages sent to the content script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum OutboundMessage {
    ToggleSidebar,
}

impl OutboundMessage {
    pub fn to_value(self) -> Value {
        match self {
            Self::ToggleSidebar => serde_json::json!({ "action": "toggle-sidebar" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_chat_request() {
        let raw = json!({
            "action": "chat-request",
            "data": { "apiBaseUrl": "http://h", "message": "m", "threadId": "t", "reset": false }
        });
        let msg = InboundMessage::from_value(&raw).unwrap().unwrap();
        match msg {
            InboundMessage::ChatRequest { data } => {
                assert_eq!(data.api_base_url, "http://h");
                assert_eq!(data.thread_id.as_deref(), Some("t"));
                assert!(!data.reset);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_chat_request_without_thread() {
        for data in [
            json!({ "apiBaseUrl": "http://h", "message": "m", "threadId": null }),
            json!({ "apiBaseUrl": "http://h", "message": "m" }),
        ] {
            let raw = json!({ "action": "chat-request", "data": data });
            match InboundMessage::from_value(&raw).unwrap() {
                Some(InboundMessage::ChatRequest { data }) => assert_eq!(data.thread_id, None),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_export_cookies() {
        let raw = json!({ "action": "export-cookies" });
        assert_eq!(
            InboundMessage::from_value(&raw).unwrap(),
            Some(InboundMessage::ExportCookies)
        );
    }

    #[test]
    fn test_unknown_action_is_unhandled() {
        assert_eq!(InboundMessage::from_value(&json!({ "action": "ping" })).unwrap(), None);
        assert_eq!(InboundMessage::from_value(&json!({ "kind": "x" })).unwrap(), None);
        assert_eq!(InboundMessage::from_value(&json!({ "action": 3 })).unwrap(), None);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        let raw = json!({ "action": "chat-request", "data": { "message": "m" } });
        assert!(InboundMessage::from_value(&raw).is_err());
    }

    #[test]
    fn test_toggle_sidebar_wire_shape() {
        let value = OutboundMessage::ToggleSidebar.to_value();
        assert_eq!(value, json!({ "action": "toggle-sidebar" }));
        assert_eq!(serde_json::to_value(OutboundMessage::ToggleSidebar).unwrap(), value);
    }
}
