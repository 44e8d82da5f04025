//! `WebSocket` handler: connection admission, relay loop, disconnect.
//!
//! Each accepted connection runs admission once, then a relay loop
//! until the transport closes or a frame fails to decode, then the
//! disconnect handler exactly once. A separate writer task drains the
//! connection's outbound queue into the socket sink so forwarding from
//! the peer never blocks on this socket.

use std::sync::Arc;

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use axum::extract::{Path, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use nexus_types::{
    decode_player_report, decode_spectre_command, default_health, origin, DecodeError, Role,
    ServerEvent, SessionId, SpectreStatus,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::AdmissionError;
use crate::peer::PeerHandle;
use crate::registry::Registry;
use crate::state::AppState;

/// Message delivered with the `game_over` event when the primary
/// tears the session down.
const GAME_OVER_MESSAGE: &str = "The primary player has left the session.";

/// Upgrade an HTTP request to a `WebSocket` connection and run the
/// admission-then-relay sequence for it.
///
/// # Route
///
/// `GET /ws/{session_id}/{client_type}`
pub async fn ws_connect(
    ws: WebSocketUpgrade,
    Path((session_id, client_type)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id, client_type))
}

/// Drive one connection through admission, relay, and disconnect.
async fn handle_socket(
    mut socket: WebSocket,
    state: Arc<AppState>,
    session_id: String,
    client_type: String,
) {
    let session_id = SessionId::new(&session_id);

    // Role validation happens before any registry interaction.
    let Some(role) = Role::from_wire(&client_type) else {
        warn!(%session_id, client_type, "connection rejected: invalid client type");
        let _ = socket.send(policy_close()).await;
        return;
    };

    let (sink, stream) = socket.split();
    let (handle, outbound) = PeerHandle::channel();
    let writer = tokio::spawn(write_pump(outbound, sink));

    match admit(&state.registry, &session_id, role, &handle).await {
        Ok(()) => {
            // Bound -> Active: the relay loop owns the connection now.
            relay_loop(&state.registry, &session_id, role, stream, &handle).await;
            handle_disconnect(&state.registry, &session_id, role).await;
        }
        Err(reason) => {
            warn!(%session_id, %role, %reason, "connection rejected during admission");
            handle.send_event(&ServerEvent::Error {
                message: reason.to_string(),
            });
            handle.send_frame(policy_close());
        }
    }

    // Let the writer flush whatever is queued, then tear down.
    drop(handle);
    let _ = writer.await;
}

/// Bind a validated connection to its session role.
///
/// Primary admission never fails: it creates the session or replaces
/// the primary binding on an existing one. Observer admission requires
/// an existing session with a free observer slot; on success the bound
/// primary is synchronously notified that the spectre attached.
pub async fn admit(
    registry: &Registry,
    id: &SessionId,
    role: Role,
    handle: &PeerHandle,
) -> Result<(), AdmissionError> {
    match role {
        Role::Primary => {
            let created = registry
                .create_or_attach_primary(id.clone(), handle.clone())
                .await;
            if created {
                info!(%id, "session created by primary");
            } else {
                info!(%id, "primary reconnected to session");
            }
        }
        Role::Observer => {
            let primary = registry.attach_observer(id, handle.clone()).await?;
            info!(%id, "observer attached to session");
            if let Some(primary) = primary {
                primary.send_event(&ServerEvent::SpectreStatus {
                    status: SpectreStatus::Connected,
                });
            }
        }
    }
    Ok(())
}

/// Receive frames until the transport closes or a frame is fatal.
async fn relay_loop(
    registry: &Registry,
    id: &SessionId,
    role: Role,
    mut stream: SplitStream<WebSocket>,
    handle: &PeerHandle,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Err(e) = relay_frame(registry, id, role, text.as_str()).await {
                    warn!(%id, %role, "fatal frame error: {e}");
                    return;
                }
            }
            Ok(Message::Ping(data)) => handle.send_frame(Message::Pong(data)),
            Ok(Message::Close(_)) => {
                debug!(%id, %role, "peer sent close frame");
                return;
            }
            Ok(_) => {
                // Binary and pong frames carry nothing for the relay.
            }
            Err(e) => {
                debug!(%id, %role, "transport error: {e}");
                return;
            }
        }
    }
}

/// Decode one inbound text frame and forward the derived event to the
/// other role, if that peer is currently bound.
///
/// Forwarding is fire-and-forget: the only check is that the target
/// handle is present. An absent peer is not an error.
///
/// # Errors
///
/// [`DecodeError::MalformedPayload`] is fatal for the sending
/// connection; the caller must stop the relay loop and run the
/// disconnect handler.
pub async fn relay_frame(
    registry: &Registry,
    id: &SessionId,
    role: Role,
    raw: &str,
) -> Result<(), DecodeError> {
    match role {
        Role::Primary => {
            let report = decode_player_report(raw)?;
            let player_pos = report.player_pos.unwrap_or_else(origin);
            // Health is pass-through only, never stored.
            let health = report.health.unwrap_or_else(default_health);
            if let Some(observer) = registry.record_player_position(id, player_pos.clone()).await
            {
                observer.send_event(&ServerEvent::PlayerState { player_pos, health });
            }
        }
        Role::Observer => {
            let command = decode_spectre_command(raw)?;
            let data = command
                .data
                .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
            if let Some(primary) = registry.primary_handle(id).await {
                primary.send_event(&ServerEvent::SpectreAction {
                    action: command.action,
                    data,
                });
            }
        }
    }
    Ok(())
}

/// Tear down or update the session after a connection leaves the
/// relay loop. Runs exactly once per connection that reached Active,
/// whether the transport closed or a frame was fatal.
pub async fn handle_disconnect(registry: &Registry, id: &SessionId, role: Role) {
    match role {
        Role::Primary => {
            // The primary owns the session: remove it and tell the
            // observer the game is over.
            if let Some(record) = registry.remove_primary(id).await {
                info!(%id, "session ended, primary disconnected");
                if let Some(observer) = record.observer {
                    observer.send_event(&ServerEvent::GameOver {
                        message: String::from(GAME_OVER_MESSAGE),
                    });
                }
            }
        }
        Role::Observer => {
            info!(%id, "observer disconnected from session");
            if let Some(primary) = registry.clear_observer(id).await {
                primary.send_event(&ServerEvent::SpectreStatus {
                    status: SpectreStatus::Disconnected,
                });
            }
        }
    }
}

/// Drain the outbound queue into the socket sink.
///
/// Ends when the queue closes (all handles dropped), a queued close
/// frame has been written, or the sink errors out.
async fn write_pump(
    mut outbound: mpsc::UnboundedReceiver<Message>,
    mut sink: SplitSink<WebSocket, Message>,
) {
    while let Some(frame) = outbound.recv().await {
        let closing = matches!(frame, Message::Close(_));
        if sink.send(frame).await.is_err() {
            debug!("peer unreachable, stopping writer");
            return;
        }
        if closing {
            return;
        }
    }
}

/// The rejecting close frame: policy violation (1008) for all
/// rejection reasons.
fn policy_close() -> Message {
    Message::Close(Some(CloseFrame {
        code: close_code::POLICY,
        reason: "policy violation".into(),
    }))
}
