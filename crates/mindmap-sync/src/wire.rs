//! WebSocket messages exchanged with the document host.

use serde::{Deserialize, Serialize};

use crate::store::{DocumentEvent, StoredDocument};

/// Messages pushed by the host to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Current content of the subscribed document.
    Snapshot { document: StoredDocument },
    /// The subscribed document does not exist.
    Deleted,
    /// The subscription failed on the host side.
    Error { code: String, message: String },
    /// Reply to [`ClientMessage::Ping`].
    Pong,
}

impl From<DocumentEvent> for ServerMessage {
    fn from(event: DocumentEvent) -> Self {
        match event {
            DocumentEvent::Changed(document) => ServerMessage::Snapshot { document },
            DocumentEvent::Deleted => ServerMessage::Deleted,
        }
    }
}

impl From<Option<StoredDocument>> for ServerMessage {
    fn from(document: Option<StoredDocument>) -> Self {
        match document {
            Some(document) => ServerMessage::Snapshot { document },
            None => ServerMessage::Deleted,
        }
    }
}

/// Messages a subscriber may send to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
}
