//! Route definitions for the webhook server.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use subtle::ConstantTimeEq;
use tower_http::trace::TraceLayer;

use crate::core::Relay;
use crate::telegram::parse_update;

/// Largest update body accepted.
const MAX_UPDATE_BYTES: usize = 1024 * 1024;

/// Shared state for handlers.
pub struct WebState {
    pub relay: Arc<Relay>,
    pub bot_token: String,
}

/// Create the full app router.
pub fn create_app_router(state: Arc<WebState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route(
            "/webhook/:token",
            post(webhook).layer(DefaultBodyLimit::max(MAX_UPDATE_BYTES)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "Bot is running!"
}

/// Telegram webhook. Always acknowledges a correctly addressed update so
/// Telegram does not redeliver it; failures are logged.
///
/// The body is taken raw so that the token is checked before anything is
/// parsed, and a malformed or untyped body still gets `200 OK`.
async fn webhook(
    State(state): State<Arc<WebState>>,
    Path(token): Path<String>,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let authorized: bool = token.as_bytes().ct_eq(state.bot_token.as_bytes()).into();
    if !authorized {
        tracing::warn!("Rejected webhook call with wrong token");
        return (StatusCode::NOT_FOUND, "Not Found");
    }

    if let Some(msg) = parse_update(&body) {
        if let Err(e) = state.relay.handle(&msg).await {
            tracing::error!("Failed to handle message from {}: {}", msg.sender.id, e);
        }
    }

    (StatusCode::OK, "OK")
}
