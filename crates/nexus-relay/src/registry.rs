//! The process-wide session registry.
//!
//! Maps normalized [`SessionId`]s to [`SessionRecord`]s behind a
//! single [`RwLock`]. A record exists exactly as long as a primary
//! connection has joined and not yet fully disconnected; the observer
//! slot may be empty at any time. Every operation takes the lock for
//! its whole check-then-set sequence, so two concurrent observer
//! attachments can never both observe an empty slot.
//!
//! Coarse global locking is deliberate: session counts are small and
//! no operation ever awaits while holding the lock.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nexus_types::{origin, Position, SessionId};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::AdmissionError;
use crate::peer::PeerHandle;

/// Mutable per-session payload.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Last position reported by the primary. Defaults to `[0, 0]`.
    pub player_pos: Position,
    /// Last observer action record. Reserved; the relay forwards
    /// actions without persisting them, so this stays empty.
    pub last_action: Option<Value>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            player_pos: origin(),
            last_action: None,
        }
    }
}

/// One session: up to one primary, up to one observer, and state.
#[derive(Debug, Clone, Default)]
pub struct SessionRecord {
    /// The bound primary connection. Externally never observed absent;
    /// primary departure removes the whole record.
    pub primary: Option<PeerHandle>,
    /// The bound observer connection, if one has joined.
    pub observer: Option<PeerHandle>,
    /// Session state, preserved across observer churn and primary
    /// reconnection.
    pub state: SessionState,
}

/// Process-wide mapping of session identifiers to session records.
///
/// The registry is the sole long-lived owner of records; connection
/// tasks operate on them only through these methods.
#[derive(Debug, Default)]
pub struct Registry {
    sessions: RwLock<HashMap<SessionId, SessionRecord>>,
}

impl Registry {
    /// Bind a primary connection, creating the session if needed.
    ///
    /// An existing record keeps its state and observer binding and
    /// only has its primary slot overwritten, so a primary can
    /// reconnect without losing the session. Never fails.
    ///
    /// Returns `true` when a new record was created.
    pub async fn create_or_attach_primary(&self, id: SessionId, handle: PeerHandle) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().primary = Some(handle);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(SessionRecord {
                    primary: Some(handle),
                    ..SessionRecord::default()
                });
                true
            }
        }
    }

    /// Bind an observer connection to an existing session.
    ///
    /// The existence check, occupancy check, and slot write happen
    /// under one lock acquisition. On success, returns the bound
    /// primary handle (if any) so the caller can deliver the
    /// `spectre_status: connected` notification.
    pub async fn attach_observer(
        &self,
        id: &SessionId,
        handle: PeerHandle,
    ) -> Result<Option<PeerHandle>, AdmissionError> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.get_mut(id).ok_or(AdmissionError::NoSuchSession)?;
        if record.observer.is_some() {
            return Err(AdmissionError::ObserverAlreadyConnected);
        }
        record.observer = Some(handle);
        Ok(record.primary.clone())
    }

    /// Snapshot a session record.
    pub async fn get(&self, id: &SessionId) -> Option<SessionRecord> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Atomically remove and return a session record.
    ///
    /// Used on primary disconnect; the identifier becomes immediately
    /// available for a fresh session.
    pub async fn remove_primary(&self, id: &SessionId) -> Option<SessionRecord> {
        self.sessions.write().await.remove(id)
    }

    /// Clear the observer slot, preserving the record and its state.
    ///
    /// Returns the bound primary handle (if any) so the caller can
    /// deliver the `spectre_status: disconnected` notification. No-op
    /// returning `None` when the session is already gone.
    pub async fn clear_observer(&self, id: &SessionId) -> Option<PeerHandle> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.get_mut(id)?;
        record.observer = None;
        record.primary.clone()
    }

    /// Store the primary's reported position and return the observer
    /// handle (if bound) for forwarding.
    pub async fn record_player_position(
        &self,
        id: &SessionId,
        pos: Position,
    ) -> Option<PeerHandle> {
        let mut sessions = self.sessions.write().await;
        let record = sessions.get_mut(id)?;
        record.state.player_pos = pos;
        record.observer.clone()
    }

    /// Look up the primary handle for forwarding an observer action.
    pub async fn primary_handle(&self, id: &SessionId) -> Option<PeerHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(id).and_then(|record| record.primary.clone())
    }

    /// Number of active sessions (health endpoint snapshot).
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
