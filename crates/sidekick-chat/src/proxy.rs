//! Forwards chat turns to `{apiBaseUrl}/api/v1/chat`.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use sidekick_core::{Error, Result};
use tracing::{debug, warn};

use crate::types::{ChatRequest, ChatResponse, ChatServiceRequest};

pub const CHAT_PATH: &str = "/api/v1/chat";

/// Stateless chat proxy. Cloning shares the underlying connection pool.
#[derive(Debug, Clone, Default)]
pub struct ChatProxy {
    client: Client,
}

impl ChatProxy {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Post one chat turn. No retry, no caching.
    pub async fn send(&self, req: &ChatRequest) -> Result<ChatResponse> {
        let url = chat_url(&req.api_base_url);
        debug!("Chat request to {} (thread {:?})", url, req.thread_id);

        let response = self
            .client
            .post(&url)
            .json(&ChatServiceRequest::from(req))
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!("Chat service error {}: {}", status.as_u16(), message);
            return Err(Error::Upstream(message));
        }

        serde_json::from_str(&body).map_err(|e| Error::Upstream(format!("Invalid JSON response: {}", e)))
    }
}

fn chat_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), CHAT_PATH)
}

/// First non-empty `detail` or `message` from a JSON error body, else
/// `HTTP <status>`. `null`, `""`, `0` and `false` count as empty.
fn error_message(status: StatusCode, body: &str) -> String {
    let fallback = || format!("HTTP {}", status.as_u16());
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };

    ["detail", "message"]
        .iter()
        .find_map(|key| match parsed.get(key)? {
            value if is_empty_value(value) => None,
            Value::String(s) => Some(s.clone()),
            // e.g. validation errors: a list of objects
            other => Some(other.to_string()),
        })
        .unwrap_or_else(fallback)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::StatusCode as AxumStatus;
    use axum::routing::post;
    use axum::{Json, Router};
    use tokio::net::TcpListener;

    /// Chat service stub: replies with `status` and `body`, echoing the request
    /// under `"echo"` when the body is `"ECHO"`.
    async fn start_service(status: u16, body: &'static str) -> String {
        let app = Router::new().route(
            CHAT_PATH,
            post(move |Json(req): Json<Value>| async move {
                let status = AxumStatus::from_u16(status).unwrap();
                if body == "ECHO" {
                    (status, serde_json::json!({ "echo": req }).to_string())
                } else {
                    (status, body.to_string())
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://127.0.0.1:{}", addr.port())
    }

    fn request(base: &str) -> ChatRequest {
        ChatRequest {
            api_base_url: base.to_string(),
            message: "hello".into(),
            thread_id: Some("t-1".into()),
            reset: true,
        }
    }

    #[test]
    fn test_chat_url() {
        assert_eq!(chat_url("http://h:8000"), "http://h:8000/api/v1/chat");
        assert_eq!(chat_url("http://h:8000/"), "http://h:8000/api/v1/chat");
    }

    #[test]
    fn test_error_message_fields() {
        let s = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(error_message(s, r#"{"detail":"bad state"}"#), "bad state");
        assert_eq!(error_message(s, r#"{"message":"nope"}"#), "nope");
        assert_eq!(error_message(s, r#"{"detail":"d","message":"m"}"#), "d");
        assert_eq!(error_message(s, r#"{"other":1}"#), "HTTP 500");
        assert_eq!(error_message(s, r#"{"detail":"","message":"m"}"#), "m");
        assert_eq!(error_message(s, r#"{"detail":0,"message":"m"}"#), "m");
        assert_eq!(error_message(s, r#"{"detail":false,"message":"m"}"#), "m");
        assert_eq!(error_message(s, r#"{"detail":null,"message":0}"#), "HTTP 500");
        assert_eq!(error_message(s, r#"{"detail":false}"#), "HTTP 500");
        assert_eq!(error_message(s, r#"{"detail":0.0}"#), "HTTP 500");
        assert_eq!(error_message(s, r#"{"detail":404}"#), "404");
        assert_eq!(error_message(s, r#"{"detail":true}"#), "true");
        assert_eq!(error_message(s, "<html>oops</html>"), "HTTP 500");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "HTTP 502");
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, r#"{"detail":[{"msg":"x"}]}"#),
            r#"[{"msg":"x"}]"#
        );
    }

    #[tokio::test]
    async fn test_success_passes_body_through() {
        let base = start_service(200, r#"{"reply":"hi"}"#).await;
        let resp = ChatProxy::default().send(&request(&base)).await.unwrap();
        assert_eq!(resp, serde_json::json!({ "reply": "hi" }));
    }

    #[tokio::test]
    async fn test_posts_snake_case_body() {
        let base = start_service(200, "ECHO").await;
        let resp = ChatProxy::default().send(&request(&base)).await.unwrap();
        assert_eq!(
            resp["echo"],
            serde_json::json!({ "message": "hello", "thread_id": "t-1", "reset": true })
        );
    }

    #[tokio::test]
    async fn test_null_thread_id_is_forwarded() {
        let base = start_service(200, "ECHO").await;
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "apiBaseUrl": base,
            "message": "hello",
            "threadId": null,
        }))
        .unwrap();
        assert_eq!(req.thread_id, None);

        let resp = ChatProxy::default().send(&req).await.unwrap();
        assert_eq!(
            resp["echo"],
            serde_json::json!({ "message": "hello", "thread_id": null, "reset": false })
        );
    }

    #[tokio::test]
    async fn test_error_detail_surfaces() {
        let base = start_service(500, r#"{"detail":"bad state"}"#).await;
        let err = ChatProxy::default().send(&request(&base)).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
        assert_eq!(err.to_string(), "bad state");
    }

    #[tokio::test]
    async fn test_unparseable_error_body() {
        let base = start_service(500, "Internal Server Error").await;
        let err = ChatProxy::default().send(&request(&base)).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let err = ChatProxy::default()
            .send(&request("http://127.0.0.1:1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
