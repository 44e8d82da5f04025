//! Relay server entry point for the Nexus protocol.
//!
//! Pairs a primary (`player1`) and an observer (`spectre`) peer under
//! a shared session identifier and relays structured messages between
//! them over `WebSocket`. All session state lives in process memory;
//! there is no persistence and no cross-process scaling.

mod config;

use std::sync::Arc;

use nexus_relay::{start_server, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Initializes structured logging, loads configuration from the
/// environment, and serves until the process is terminated.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the server cannot
/// bind its listener.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("nexus-server starting");

    let config = config::from_env()?;
    info!(host = config.host, port = config.port, "configuration loaded");

    let state = Arc::new(AppState::new());
    start_server(&config, state).await?;

    Ok(())
}
