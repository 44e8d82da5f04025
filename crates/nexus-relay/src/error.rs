//! Error types for connection admission.
//!
//! [`AdmissionError`] covers every reason a connection can be rejected
//! before it reaches the relay loop. The `Display` text of each
//! variant is the client-facing message sent in the
//! `{"type":"error",...}` payload before the rejecting close, so it is
//! part of the wire contract.

/// Reasons a connection is rejected during admission.
///
/// All rejections close the socket with the policy-violation close
/// code (1008). None of them mutate the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    /// The `client_type` path segment was outside the two-value role
    /// set. Detected before any registry interaction; no error payload
    /// is sent for this case.
    #[error("invalid client type")]
    InvalidRole,

    /// An observer tried to join a session no primary has created
    /// (or one that has already ended).
    #[error("invalid or ended session id")]
    NoSuchSession,

    /// An observer tried to join a session whose observer slot is
    /// already occupied.
    #[error("a spectre is already connected to this session")]
    ObserverAlreadyConnected,
}
