//! Integration tests for the relay core and the HTTP surface.
//!
//! HTTP tests drive Axum's `Router` directly via `tower::ServiceExt`
//! without starting a TCP server. Relay tests drive the admission,
//! relay, and disconnect functions against a real registry, with
//! mpsc-backed peer handles standing in for live sockets.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;

use axum::body::Body;
use axum::extract::ws::Message;
use axum::http::{Request, StatusCode};
use nexus_relay::ws::{admit, handle_disconnect, relay_frame};
use nexus_relay::{build_router, AdmissionError, AppState, PeerHandle, Registry};
use nexus_types::{Role, SessionId};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

/// Pop the next queued frame from a peer's outbound channel as JSON.
fn next_event(rx: &mut UnboundedReceiver<Message>) -> Value {
    match rx.try_recv().unwrap() {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn no_event(rx: &mut UnboundedReceiver<Message>) -> bool {
    rx.try_recv().is_err()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =========================================================================
// HTTP surface
// =========================================================================

#[tokio::test]
async fn test_health_reports_active_sessions() {
    let state = Arc::new(AppState::new());
    let router = build_router(Arc::clone(&state));

    let response = router
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "Nexus Protocol Server Running");
    assert_eq!(json["sessions_active"], 0);

    // One primary join shows up in the snapshot count.
    let (handle, _rx) = PeerHandle::channel();
    state
        .registry
        .create_or_attach_primary(SessionId::new("nx-1"), handle)
        .await;

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["sessions_active"], 1);
}

// =========================================================================
// Relay core
// =========================================================================

#[tokio::test]
async fn test_full_session_lifecycle() {
    let registry = Registry::default();
    let id = SessionId::new("nx-1");

    // Primary joins and creates the session.
    let (primary, mut primary_rx) = PeerHandle::channel();
    admit(&registry, &id, Role::Primary, &primary).await.unwrap();

    // Primary reports state before any observer is bound: no event is
    // forwarded anywhere and the send does not error.
    relay_frame(&registry, &id, Role::Primary, r#"{"player_pos":[3,4],"health":80}"#)
        .await
        .unwrap();
    assert!(no_event(&mut primary_rx));
    let record = registry.get(&id).await.unwrap();
    assert_eq!(json!(record.state.player_pos), json!([3, 4]));

    // Observer joins with different casing; the primary is notified.
    let (observer, mut observer_rx) = PeerHandle::channel();
    admit(&registry, &SessionId::new("NX-1"), Role::Observer, &observer)
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut primary_rx),
        json!({"type": "spectre_status", "status": "connected"})
    );

    // Observer action is forwarded to the primary verbatim.
    relay_frame(
        &registry,
        &id,
        Role::Observer,
        r#"{"action":"reveal","data":{"x":3}}"#,
    )
    .await
    .unwrap();
    assert_eq!(
        next_event(&mut primary_rx),
        json!({"type": "spectre_action", "action": "reveal", "data": {"x": 3}})
    );

    // Primary report without health: observer gets the default 100.
    relay_frame(&registry, &id, Role::Primary, r#"{"player_pos":[5,5]}"#)
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut observer_rx),
        json!({"type": "player_state", "player_pos": [5, 5], "health": 100})
    );

    // Primary disconnects: observer gets game_over, the session is
    // gone, and a later observer join fails.
    handle_disconnect(&registry, &id, Role::Primary).await;
    let game_over = next_event(&mut observer_rx);
    assert_eq!(game_over["type"], "game_over");
    assert!(game_over["message"].is_string());

    let (late, _late_rx) = PeerHandle::channel();
    assert_eq!(
        admit(&registry, &SessionId::new("NX-1"), Role::Observer, &late).await,
        Err(AdmissionError::NoSuchSession)
    );
}

#[tokio::test]
async fn test_forwarding_is_role_pure() {
    let registry = Registry::default();
    let id = SessionId::new("pure");

    let (primary, mut primary_rx) = PeerHandle::channel();
    let (observer, mut observer_rx) = PeerHandle::channel();
    admit(&registry, &id, Role::Primary, &primary).await.unwrap();
    admit(&registry, &id, Role::Observer, &observer).await.unwrap();
    // Drain the admission notification.
    assert_eq!(next_event(&mut primary_rx)["type"], "spectre_status");

    // A primary frame only ever yields player_state, to the observer.
    relay_frame(&registry, &id, Role::Primary, r#"{"player_pos":[1,2]}"#)
        .await
        .unwrap();
    assert_eq!(next_event(&mut observer_rx)["type"], "player_state");
    assert!(no_event(&mut primary_rx));

    // An observer frame only ever yields spectre_action, to the primary.
    relay_frame(&registry, &id, Role::Observer, r#"{"action":"ping"}"#)
        .await
        .unwrap();
    assert_eq!(
        next_event(&mut primary_rx),
        json!({"type": "spectre_action", "action": "ping", "data": {}})
    );
    assert!(no_event(&mut observer_rx));
}

#[tokio::test]
async fn test_primary_position_defaults_to_origin() {
    let registry = Registry::default();
    let id = SessionId::new("dflt");

    let (primary, _primary_rx) = PeerHandle::channel();
    let (observer, mut observer_rx) = PeerHandle::channel();
    admit(&registry, &id, Role::Primary, &primary).await.unwrap();
    admit(&registry, &id, Role::Observer, &observer).await.unwrap();

    relay_frame(&registry, &id, Role::Primary, r"{}").await.unwrap();
    assert_eq!(
        next_event(&mut observer_rx),
        json!({"type": "player_state", "player_pos": [0, 0], "health": 100})
    );
}

#[tokio::test]
async fn test_malformed_frame_is_fatal_and_disconnects_cleanly() {
    let registry = Registry::default();
    let id = SessionId::new("bad");

    let (primary, mut primary_rx) = PeerHandle::channel();
    let (observer, _observer_rx) = PeerHandle::channel();
    admit(&registry, &id, Role::Primary, &primary).await.unwrap();
    admit(&registry, &id, Role::Observer, &observer).await.unwrap();
    assert_eq!(next_event(&mut primary_rx)["type"], "spectre_status");

    // The observer sends garbage: fatal for that connection.
    let result = relay_frame(&registry, &id, Role::Observer, "not json").await;
    assert!(result.is_err());

    // The fatal error is handled exactly like a normal observer
    // disconnect: slot cleared, primary notified, record preserved.
    handle_disconnect(&registry, &id, Role::Observer).await;
    assert_eq!(
        next_event(&mut primary_rx),
        json!({"type": "spectre_status", "status": "disconnected"})
    );
    assert_eq!(registry.session_count().await, 1);

    let (replacement, _rx) = PeerHandle::channel();
    assert!(admit(&registry, &id, Role::Observer, &replacement).await.is_ok());
}

#[tokio::test]
async fn test_observer_rejections_are_ordered() {
    let registry = Registry::default();
    let id = SessionId::new("full");

    let (primary, _primary_rx) = PeerHandle::channel();
    admit(&registry, &id, Role::Primary, &primary).await.unwrap();

    let (first, _first_rx) = PeerHandle::channel();
    admit(&registry, &id, Role::Observer, &first).await.unwrap();

    let (second, _second_rx) = PeerHandle::channel();
    assert_eq!(
        admit(&registry, &id, Role::Observer, &second).await,
        Err(AdmissionError::ObserverAlreadyConnected)
    );

    // The registry still holds exactly one observer.
    let record = registry.get(&id).await.unwrap();
    assert!(record.observer.is_some());
}
