//! Client for a remote document host (see the `mindmap-api` crate).
//!
//! Writes go over HTTP, subscriptions over a WebSocket that pushes
//! [`ServerMessage`]s. A dropped connection ends the subscription with a
//! subscription error; there is no automatic reconnect.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::store::{DocumentEvent, DocumentPath, DocumentStore, EventSink, StoredDocument, Subscription};
use crate::wire::ServerMessage;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A [`DocumentStore`] backed by a document host over the network.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: String,
    http: reqwest::Client,
}

impl RemoteStore {
    /// `base_url` is the host root, e.g. `http://localhost:4300`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn document_url(&self) -> String {
        format!("{}/api/document", self.base_url)
    }

    fn ws_url(&self, path: &DocumentPath) -> SyncResult<Url> {
        let mut url = Url::parse(&format!("{}/api/ws", self.base_url)).map_err(|e| {
            SyncError::subscription(format!("invalid store url {}: {e}", self.base_url))
        })?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        url.set_scheme(scheme).map_err(|_| {
            SyncError::subscription(format!("unsupported store url {}", self.base_url))
        })?;
        url.query_pairs_mut().append_pair("path", path.as_str());
        Ok(url)
    }
}

#[async_trait]
impl DocumentStore for RemoteStore {
    async fn subscribe(&self, path: &DocumentPath) -> SyncResult<Subscription> {
        let url = self.ws_url(path)?;
        let (socket, _) = connect_async(url.as_str())
            .await
            .map_err(|e| SyncError::subscription(format!("failed to connect to {url}: {e}")))?;
        info!(path = %path, url = %url, "remote_subscription_opened");

        let (sink, subscription) = Subscription::channel();
        tokio::spawn(pump(socket, sink, path.clone()));
        Ok(subscription)
    }

    async fn write(&self, path: &DocumentPath, document: StoredDocument) -> SyncResult<()> {
        let response = self
            .http
            .put(self.document_url())
            .query(&[("path", path.as_str())])
            .json(&document)
            .send()
            .await
            .map_err(|e| SyncError::write(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::write(format!(
                "store rejected write ({status}): {body}"
            )));
        }
        debug!(path = %path, "remote_write_committed");
        Ok(())
    }
}

/// Forward host messages into the subscription until either side goes away.
async fn pump(mut socket: Socket, sink: EventSink, path: DocumentPath) {
    loop {
        tokio::select! {
            _ = sink.closed() => {
                let _ = socket.close(None).await;
                debug!(path = %path, "remote_subscription_cancelled");
                return;
            }

            message = socket.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => {
                        let item = match serde_json::from_str::<ServerMessage>(text.as_str()) {
                            Ok(ServerMessage::Snapshot { document }) => {
                                Some(Ok(DocumentEvent::Changed(document)))
                            }
                            Ok(ServerMessage::Deleted) => Some(Ok(DocumentEvent::Deleted)),
                            Ok(ServerMessage::Error { code, message }) => {
                                Some(Err(SyncError::subscription(format!("{code}: {message}"))))
                            }
                            Ok(ServerMessage::Pong) => None,
                            Err(e) => {
                                warn!(path = %path, error = %e, "unreadable_server_message");
                                Some(Err(SyncError::subscription(format!(
                                    "unreadable message from store: {e}"
                                ))))
                            }
                        };
                        if let Some(item) = item {
                            if !sink.send(item) {
                                let _ = socket.close(None).await;
                                return;
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = socket.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(path = %path, "remote_subscription_closed");
                        sink.send(Err(SyncError::subscription("connection to store closed")));
                        return;
                    }
                    Some(Err(e)) => {
                        warn!(path = %path, error = %e, "remote_subscription_failed");
                        sink.send(Err(SyncError::subscription(e.to_string())));
                        return;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
