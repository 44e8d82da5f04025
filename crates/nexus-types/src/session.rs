//! Session addressing and peer roles.
//!
//! A session is identified by an opaque token supplied by the primary
//! peer. Tokens are normalized to ASCII uppercase on construction so
//! the two peers never need to agree on exact casing; equality is
//! exact after normalization.

use serde::{Deserialize, Serialize};

/// A case-normalized session identifier.
///
/// Construction uppercases the raw token, so `nx-1` and `NX-1` address
/// the same session. The server never generates identifiers; they
/// arrive on the connection path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Normalize a raw token into a session identifier.
    pub fn new(raw: &str) -> Self {
        Self(raw.to_ascii_uppercase())
    }

    /// Return the normalized token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl core::fmt::Display for SessionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two peer roles of a session. Fixed set, no extensibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Reports authoritative state (position) and receives actions.
    /// Wire name `player1`.
    #[serde(rename = "player1")]
    Primary,
    /// Issues actions and receives state reports. Wire name `spectre`.
    #[serde(rename = "spectre")]
    Observer,
}

impl Role {
    /// Parse a role from its wire name, case-insensitively.
    ///
    /// Returns `None` for anything outside the two literal names,
    /// which admission treats as a protocol violation.
    pub fn from_wire(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("player1") {
            Some(Self::Primary)
        } else if raw.eq_ignore_ascii_case("spectre") {
            Some(Self::Observer)
        } else {
            None
        }
    }

    /// The canonical wire name of this role.
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Primary => "player1",
            Self::Observer => "spectre",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}
