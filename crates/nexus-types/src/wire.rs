//! The wire message envelope and its codec.
//!
//! Outbound traffic is the internally-tagged [`ServerEvent`] enum
//! (`{"type": "player_state", ...}`). Inbound traffic is role-specific:
//! a primary sends [`PlayerReport`] frames, an observer sends
//! [`SpectreCommand`] frames. Numeric payload fields use
//! [`serde_json::Number`] so values pass through verbatim -- an inbound
//! `[3, 4]` is forwarded as `[3, 4]`, never `[3.0, 4.0]`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A 2-element position vector, `[x, y]`.
pub type Position = [Number; 2];

/// The default position reported before any primary update, `[0, 0]`.
pub fn origin() -> Position {
    [Number::from(0), Number::from(0)]
}

/// The default health value forwarded when a report omits the field.
pub fn default_health() -> Number {
    Number::from(100)
}

/// Decode failure for an inbound frame.
///
/// Malformed payloads are fatal for the connection that sent them:
/// the relay loop stops and the disconnect handler runs as if the
/// transport had closed.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The frame was not well-formed JSON or did not match the
    /// role-specific schema.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

/// Inbound frame from the primary peer: `{"player_pos": [x, y], "health"?: n}`.
///
/// Both fields are optional at the codec level; the relay defaults
/// `player_pos` to [`origin`] and `health` to [`default_health`].
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerReport {
    /// Last known position, if reported.
    pub player_pos: Option<Position>,
    /// Health value to pass through to the observer, if reported.
    /// Never stored in session state.
    pub health: Option<Number>,
}

/// Inbound frame from the observer peer: `{"action": "...", "data"?: {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpectreCommand {
    /// The action name, forwarded verbatim.
    pub action: String,
    /// Opaque action payload; the relay defaults it to `{}`.
    pub data: Option<Value>,
}

/// Observer attachment status, as reported to the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectreStatus {
    /// An observer has attached to the session.
    Connected,
    /// The observer detached; the session remains joinable.
    Disconnected,
}

/// Outbound envelope, server to peer.
///
/// Tagged JSON over the closed set of wire event types. Every variant
/// maps to exactly one relay or lifecycle notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// State report derived from a primary frame, sent to the observer.
    PlayerState {
        /// The updated position.
        player_pos: Position,
        /// Pass-through health value.
        health: Number,
    },
    /// Action derived from an observer frame, sent to the primary.
    SpectreAction {
        /// The action name, verbatim.
        action: String,
        /// The action payload, verbatim.
        data: Value,
    },
    /// Observer lifecycle notification, sent to the primary.
    SpectreStatus {
        /// Whether the observer attached or detached.
        status: SpectreStatus,
    },
    /// The primary disconnected and the session was torn down.
    GameOver {
        /// Human-readable reason.
        message: String,
    },
    /// Machine-readable rejection, sent immediately before a
    /// rejecting close.
    Error {
        /// Human-readable reason.
        message: String,
    },
}

impl ServerEvent {
    /// Encode this event as a JSON text frame.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode a primary inbound frame.
pub fn decode_player_report(raw: &str) -> Result<PlayerReport, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}

/// Decode an observer inbound frame.
pub fn decode_spectre_command(raw: &str) -> Result<SpectreCommand, DecodeError> {
    Ok(serde_json::from_str(raw)?)
}
