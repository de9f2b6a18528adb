//! Inbound extension messages — `{action, data}` in, envelope out.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use sidekick_background::{Dispatch, ResponseEnvelope};
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/messages", post(post_message))
}

/// Waits for the deferred reply. Unhandled actions are rejected explicitly so
/// an HTTP caller never waits on a reply that will not come.
async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<Value>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    match state.coordinator.router.dispatch(&raw) {
        Dispatch::Deferred(rx) => match rx.await {
            Ok(envelope) => (StatusCode::OK, Json(envelope)),
            Err(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ResponseEnvelope::err("Message handler stopped before replying")),
            ),
        },
        Dispatch::Unhandled { action } => {
            let action = action.unwrap_or_else(|| "<missing>".to_string());
            warn!("Rejecting unhandled action {}", action);
            (
                StatusCode::BAD_REQUEST,
                Json(ResponseEnvelope::err(format!("Unhandled action: {}", action))),
            )
        }
    }
}
