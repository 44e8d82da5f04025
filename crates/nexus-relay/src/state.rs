//! Shared application state for the relay server.
//!
//! [`AppState`] owns the session [`Registry`]; it is wrapped in an
//! [`Arc`](std::sync::Arc) and injected into handlers via Axum's
//! `State` extractor. The registry is the only resource shared across
//! connection tasks.

use crate::registry::Registry;

/// Shared state for the Axum application.
#[derive(Debug, Default)]
pub struct AppState {
    /// The process-wide session registry.
    pub registry: Registry,
}

impl AppState {
    /// Create application state with an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}
