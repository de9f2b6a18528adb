//! Toolbar action clicks.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use sidekick_background::{ClickOutcome, ResponseEnvelope};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/action/click", post(click))
}

#[derive(Debug, Default, Deserialize)]
struct ClickBody {
    #[serde(rename = "tabId")]
    tab_id: Option<String>,
}

impl ClickBody {
    /// An empty body means "the active tab".
    fn parse(bytes: &[u8]) -> serde_json::Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }
}

#[derive(Serialize)]
struct ClickResponse {
    success: bool,
    outcome: ClickOutcome,
}

/// Succeeds for any well-formed body: delivery problems are logged by the
/// relay, not surfaced.
async fn click(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let body = match ClickBody::parse(&body) {
        Ok(body) => body,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(<ResponseEnvelope>::err(format!("Invalid click body: {}", e))),
            )
                .into_response();
        }
    };

    let outcome = state
        .coordinator
        .relay
        .on_clicked_tab(body.tab_id.as_deref())
        .await;
    Json(ClickResponse {
        success: true,
        outcome,
    })
    .into_response()
}
