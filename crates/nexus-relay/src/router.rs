//! Axum router construction for the relay server.
//!
//! Assembles the health endpoint and the `WebSocket` route into a
//! single [`Router`] with CORS middleware enabled so browser clients
//! can connect from any origin.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the relay server.
///
/// Routes:
/// - `GET /` -- health snapshot (`{"status": ..., "sessions_active": N}`)
/// - `GET /ws/{session_id}/{client_type}` -- `WebSocket` upgrade;
///   `client_type` is `player1` or `spectre`
///
/// CORS is configured to allow any origin for deployment flexibility.
/// In production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::health))
        .route("/ws/{session_id}/{client_type}", get(ws::ws_connect))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
