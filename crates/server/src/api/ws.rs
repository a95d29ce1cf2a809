//! WebSocket support for live session updates.
//!
//! Every client receives the current snapshot on connect and then each new
//! snapshot the controller publishes. Intermediate snapshots may be skipped
//! when a client is slow; the latest one always arrives.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use mediabatch_core::SessionSnapshot;

use crate::state::AppState;

/// WebSocket message sent to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// The session changed.
    Snapshot { snapshot: SessionSnapshot },
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let rx = state.session().subscribe();
    ws.on_upgrade(move |socket| handle_socket(socket, rx))
}

async fn handle_socket(socket: WebSocket, mut rx: watch::Receiver<SessionSnapshot>) {
    info!("WebSocket client connected");

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = WsMessage::Snapshot {
                snapshot: rx.borrow_and_update().clone(),
            };
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize WebSocket message: {}", e);
                    break;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!("WebSocket send failed, client disconnected");
                break;
            }
            if rx.changed().await.is_err() {
                debug!("Session controller stopped");
                break;
            }
        }
    });

    loop {
        tokio::select! {
            _ = &mut send_task => break,
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("WebSocket client requested close");
                    break;
                }
                Some(Ok(Message::Text(text))) => {
                    debug!("Ignoring client message: {}", text.as_str());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("WebSocket receive error: {}", e);
                    break;
                }
            },
        }
    }

    send_task.abort();
    info!("WebSocket client disconnected");
}
