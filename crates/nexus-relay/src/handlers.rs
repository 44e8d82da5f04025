//! HTTP handlers for the introspection surface.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Health snapshot returned by `GET /`.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Fixed liveness banner.
    pub status: &'static str,
    /// Current number of active sessions.
    pub sessions_active: usize,
}

/// Report process liveness and a snapshot count of active sessions.
///
/// # Route
///
/// `GET /`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "Nexus Protocol Server Running",
        sessions_active: state.registry.session_count().await,
    })
}
