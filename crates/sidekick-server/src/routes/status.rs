//! Relay status.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let config = &state.coordinator.config;
    Json(serde_json::json!({
        "name": "sidekick",
        "version": env!("CARGO_PKG_VERSION"),
        "cdpUrl": state.config.cdp_url,
        "restrictedSchemes": config.restricted_schemes,
        "allowedOrigins": config.allowed_origins,
    }))
}
