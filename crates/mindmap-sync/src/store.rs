//! The document store capability and its event stream.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::SyncResult;

// =============================================================================
// Document addressing and shape
// =============================================================================

/// Location of one document in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The well-known slot holding the shared mind map of one app instance.
    pub fn singleton(app_id: &str, document: &str) -> Self {
        Self(format!("artifacts/{app_id}/public/data/mindMaps/{document}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Persisted document: the encoded mind map and when it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    /// Payload produced by [`mindmap_core::encode`].
    pub mind_map: String,
    /// Unix time in milliseconds.
    pub last_updated: u64,
}

impl StoredDocument {
    pub fn new(mind_map: impl Into<String>, last_updated: u64) -> Self {
        Self {
            mind_map: mind_map.into(),
            last_updated,
        }
    }

    /// Stamp a payload with the current time.
    pub fn stamped(mind_map: impl Into<String>) -> Self {
        Self::new(mind_map, now_millis())
    }
}

/// Current unix time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// One change notification for a subscribed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The document exists with this content.
    Changed(StoredDocument),
    /// The document does not exist (never written, or removed).
    Deleted,
}

// =============================================================================
// Subscription stream
// =============================================================================

type EventItem = SyncResult<DocumentEvent>;

/// Producer half of a [`Subscription`], held by store implementations.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<EventItem>,
    cancel: CancellationToken,
}

impl EventSink {
    /// Deliver one item. Returns `false` once the subscriber is gone.
    pub fn send(&self, item: EventItem) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.tx.send(item).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves when the subscriber cancels or drops its end.
    pub async fn closed(&self) {
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = self.tx.closed() => {}
        }
    }
}

/// Push-based stream of [`DocumentEvent`]s for one document.
///
/// Events arrive in the order the store committed them. Cancelling is
/// idempotent and also happens on drop; after it, no further events are
/// yielded.
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<EventItem>,
    cancel: CancellationToken,
}

impl Subscription {
    /// Create a connected sink/subscription pair.
    pub fn channel() -> (EventSink, Subscription) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        (
            EventSink {
                tx,
                cancel: cancel.clone(),
            },
            Subscription { rx, cancel },
        )
    }

    /// Wait for the next event. `None` once cancelled or the store hung up.
    pub async fn next(&mut self) -> Option<EventItem> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            item = self.rx.recv() => item,
        }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Stream for Subscription {
    type Item = EventItem;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.cancel.is_cancelled() {
            return Poll::Ready(None);
        }
        this.rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// =============================================================================
// Capability
// =============================================================================

/// A realtime document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a change stream. The first event describes the current state.
    async fn subscribe(&self, path: &DocumentPath) -> SyncResult<Subscription>;

    /// Replace the document at `path`.
    async fn write(&self, path: &DocumentPath, document: StoredDocument) -> SyncResult<()>;
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;

    #[test]
    fn stored_document_uses_camel_case_fields() {
        let doc = StoredDocument::new("{}", 42);
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"mindMap":"{}","lastUpdated":42}"#);
        let back: StoredDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[tokio::test]
    async fn events_flow_until_cancelled() {
        let (sink, mut subscription) = Subscription::channel();
        assert!(sink.send(Ok(DocumentEvent::Deleted)));
        assert!(matches!(
            subscription.next().await,
            Some(Ok(DocumentEvent::Deleted))
        ));

        subscription.cancel();
        subscription.cancel();
        assert!(subscription.is_cancelled());
        assert!(!sink.send(Ok(DocumentEvent::Deleted)));
        assert!(sink.is_closed());
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn dropping_the_subscription_closes_the_sink() {
        let (sink, subscription) = Subscription::channel();
        drop(subscription);
        sink.closed().await;
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn subscription_is_a_stream() {
        let (sink, subscription) = Subscription::channel();
        sink.send(Ok(DocumentEvent::Changed(StoredDocument::new("a", 1))));
        sink.send(Ok(DocumentEvent::Deleted));
        drop(sink);
        let events: Vec<DocumentEvent> = subscription
            .map(|item| item.unwrap())
            .collect()
            .await;
        assert_eq!(
            events,
            vec![
                DocumentEvent::Changed(StoredDocument::new("a", 1)),
                DocumentEvent::Deleted
            ]
        );
    }
}
