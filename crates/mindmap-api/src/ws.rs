//! WebSocket change stream for one document.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::Response,
};
use mindmap_sync::wire::{ClientMessage, ServerMessage};
use mindmap_sync::{DocumentPath, StoredDocument};
use tokio::sync::broadcast;
use tracing::{debug, error, warn};

use crate::routes::document_path;
use crate::types::{ApiState, DocumentChange, DocumentQuery};

/// Handler for WebSocket upgrade at GET /api/ws?path=...
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DocumentQuery>,
) -> Response {
    match document_path(&query) {
        Ok(path) => ws.on_upgrade(move |socket| handle_socket(socket, state, path)),
        Err(response) => response,
    }
}

/// Subscribe and read the current document atomically with respect to
/// writers, so the stream continues exactly where the snapshot ends.
async fn subscribe(
    state: &ApiState,
    path: &DocumentPath,
) -> (broadcast::Receiver<DocumentChange>, Option<StoredDocument>) {
    let documents = state.documents.read().await;
    (state.tx.subscribe(), documents.get(path).cloned())
}

/// Handle an individual WebSocket connection.
async fn handle_socket(mut socket: WebSocket, state: Arc<ApiState>, path: DocumentPath) {
    debug!(path = %path, "WebSocket subscriber connected");

    let (mut rx, current) = subscribe(&state, &path).await;
    if let Err(e) = send_server_message(&mut socket, &ServerMessage::from(current)).await {
        error!("Failed to send initial snapshot: {}", e);
        return;
    }

    loop {
        tokio::select! {
            // Handle incoming messages from client
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = handle_client_message(text.as_str(), &mut socket).await {
                            warn!("Error handling client message: {}", e);
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        debug!(path = %path, "WebSocket subscriber disconnected");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Ignore binary, ping, pong frames
                    }
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        debug!("WebSocket stream ended");
                        break;
                    }
                }
            }

            // Forward committed changes for this document
            change = rx.recv() => {
                match change {
                    Ok(change) if change.path == path => {
                        let message = ServerMessage::from(change.document);
                        if let Err(e) = send_server_message(&mut socket, &message).await {
                            error!("Failed to send WebSocket message: {}", e);
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(path = %path, missed = n, "WebSocket subscriber lagged, resyncing");
                        let (fresh, current) = subscribe(&state, &path).await;
                        rx = fresh;
                        if let Err(e) = send_server_message(&mut socket, &ServerMessage::from(current)).await {
                            error!("Failed to send WebSocket message: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }
        }
    }
}

/// Handle a message from the client.
async fn handle_client_message(
    text: &str,
    socket: &mut WebSocket,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(ClientMessage::Ping) => {
            send_server_message(socket, &ServerMessage::Pong).await?;
        }
        Err(e) => {
            let reply = ServerMessage::Error {
                code: "BAD_MESSAGE".to_string(),
                message: e.to_string(),
            };
            send_server_message(socket, &reply).await?;
        }
    }
    Ok(())
}

/// Send a server message to the client.
async fn send_server_message(
    socket: &mut WebSocket,
    msg: &ServerMessage,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let json = serde_json::to_string(msg)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}
