//! Shared type definitions for the Nexus relay.
//!
//! This crate defines everything that crosses the wire between the
//! server and its two peer roles:
//!
//! - [`SessionId`] and [`Role`] -- session addressing and the closed
//!   two-value role set
//! - [`ServerEvent`] -- the tagged JSON envelope sent to peers
//! - [`PlayerReport`] and [`SpectreCommand`] -- the role-specific
//!   inbound frames
//! - [`DecodeError`] -- the single failure mode of the codec
//!
//! The codec imposes no schema beyond well-formedness of the typed
//! frames. Defaulting rules (position `[0, 0]`, health `100`, action
//! data `{}`) are applied by the relay at the call site, never
//! silently inside deserialization.

pub mod session;
pub mod wire;

// Re-export primary types for convenience.
pub use session::{Role, SessionId};
pub use wire::{
    decode_player_report, decode_spectre_command, default_health, origin, DecodeError,
    PlayerReport, Position, ServerEvent, SpectreCommand, SpectreStatus,
};
