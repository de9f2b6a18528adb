//! HTTP route handlers for the content-script relay.

pub mod action;
pub mod messages;
pub mod status;

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use sidekick_background::ResponseEnvelope;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.clone()))
        .with_state(state)
}

fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Anything that touches the browser requires an allowed origin.
    let guarded = Router::new()
        .merge(messages::routes())
        .merge(action::routes())
        .route_layer(middleware::from_fn_with_state(state, require_allowed_origin));

    Router::new().merge(status::routes()).merge(guarded)
}

fn cors_layer(state: Arc<AppState>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _: &axum::http::request::Parts| {
                origin
                    .to_str()
                    .map(|o| state.coordinator.config.is_allowed_origin(o))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Rejects browser requests from origins outside the allow-list. Requests
/// without an `Origin` header (CLI, curl) pass through.
async fn require_allowed_origin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !state.coordinator.config.is_allowed_origin(origin) {
            warn!("Rejecting request from origin {:?}", origin);
            return (
                StatusCode::FORBIDDEN,
                Json(<ResponseEnvelope>::err(format!("Origin not allowed: {}", origin))),
            )
                .into_response();
        }
    }
    next.run(request).await
}
