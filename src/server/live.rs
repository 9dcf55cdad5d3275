//! Live rebuild notifications over WebSocket

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ServerState;
use crate::compiler::BuildEvent;

/// Messages pushed to connected clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LiveMessage {
    /// Connection established
    Connected,

    /// A build pass started
    Compiling { had_issues: bool },

    /// A build pass finished cleanly
    BuildSuccess {
        bundle_size: usize,
        duration_ms: u64,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        warnings: Vec<String>,
    },

    /// A build pass failed
    BuildFailure { errors: Vec<String> },
}

impl From<&BuildEvent> for LiveMessage {
    fn from(event: &BuildEvent) -> Self {
        match event {
            BuildEvent::Compiling { had_issues } => LiveMessage::Compiling {
                had_issues: *had_issues,
            },
            BuildEvent::Done { stats } if stats.has_errors() => LiveMessage::BuildFailure {
                errors: stats.errors.clone(),
            },
            BuildEvent::Done { stats } => LiveMessage::BuildSuccess {
                bundle_size: stats.bundle_size,
                duration_ms: stats.duration_ms,
                warnings: stats.warnings.clone(),
            },
        }
    }
}

/// Handle WebSocket upgrade for live notifications
pub async fn live_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> Response {
    ws.on_upgrade(|socket| handle_live_socket(socket, state))
}

/// Handle one client connection
async fn handle_live_socket(socket: WebSocket, state: Arc<ServerState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe to build events
    let mut events_rx = state.events_tx.subscribe();

    // Send connected message
    if let Ok(json) = serde_json::to_string(&LiveMessage::Connected) {
        let _ = sender.send(Message::Text(json)).await;
    }

    debug!("Live client connected");

    // Forward build events to the client
    let send_task = tokio::spawn(async move {
        while let Ok(event) = events_rx.recv().await {
            let message = LiveMessage::from(&event);
            if let Ok(json) = serde_json::to_string(&message) {
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Drain the client side until it closes
    let recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Close(_) => {
                    debug!("Live client disconnected");
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }

    debug!("Live connection closed");
}
