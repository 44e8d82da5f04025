//! Rendezvous and relay server for the Nexus protocol.
//!
//! This crate provides an Axum HTTP server that pairs exactly two
//! real-time peers -- a primary (`player1`) and an observer
//! (`spectre`) -- under a shared session identifier and relays
//! structured JSON messages between them:
//!
//! - **`WebSocket` endpoint** (`/ws/{session_id}/{client_type}`) where
//!   each connection is admitted into a session role and then pumped
//!   by a per-connection relay loop
//! - **Health endpoint** (`GET /`) reporting process liveness and the
//!   number of active sessions
//!
//! # Architecture
//!
//! The [`Registry`] is the single process-wide owner of session
//! records; every connection task goes through its operation contract,
//! so a concurrent attach and removal on the same identifier always
//! serialize. Connections hold only a [`PeerHandle`] -- a non-blocking
//! sender feeding the peer's writer task -- so relaying never waits on
//! a slow peer.
//!
//! [`Registry`]: registry::Registry
//! [`PeerHandle`]: peer::PeerHandle

pub mod error;
pub mod handlers;
pub mod peer;
pub mod registry;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::AdmissionError;
pub use peer::PeerHandle;
pub use registry::{Registry, SessionRecord, SessionState};
pub use router::build_router;
pub use server::{start_server, ServerConfig, ServerError};
pub use state::AppState;
