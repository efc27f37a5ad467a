//! In-process document store.
//!
//! Used in local-only mode and as the store double in tests. Writes are
//! committed and fanned out under one lock, so every subscriber observes
//! commits in the same order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::store::{DocumentEvent, DocumentPath, DocumentStore, EventSink, StoredDocument, Subscription};

#[derive(Default)]
struct Inner {
    documents: HashMap<DocumentPath, StoredDocument>,
    subscribers: HashMap<DocumentPath, Vec<EventSink>>,
}

impl Inner {
    fn publish(&mut self, path: &DocumentPath, event: &DocumentEvent) {
        if let Some(sinks) = self.subscribers.get_mut(path) {
            sinks.retain(|sink| sink.send(Ok(event.clone())));
        }
    }
}

/// A [`DocumentStore`] kept entirely in memory.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_writes: AtomicBool,
    fail_subscriptions: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content at `path`, if any.
    pub async fn get(&self, path: &DocumentPath) -> Option<StoredDocument> {
        self.inner.lock().await.documents.get(path).cloned()
    }

    /// Remove a document and notify subscribers. Returns whether it existed.
    pub async fn delete(&self, path: &DocumentPath) -> bool {
        let mut inner = self.inner.lock().await;
        let existed = inner.documents.remove(path).is_some();
        inner.publish(path, &DocumentEvent::Deleted);
        existed
    }

    /// Live subscribers for `path`.
    pub async fn subscriber_count(&self, path: &DocumentPath) -> usize {
        let mut inner = self.inner.lock().await;
        match inner.subscribers.get_mut(path) {
            Some(sinks) => {
                sinks.retain(|sink| !sink.is_closed());
                sinks.len()
            }
            None => 0,
        }
    }

    /// Make subsequent writes fail with a write error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent subscribe calls fail with a subscription error.
    pub fn fail_subscriptions(&self, fail: bool) {
        self.fail_subscriptions.store(fail, Ordering::SeqCst);
    }

    /// Terminate every stream on `path` with a subscription error.
    pub async fn break_subscriptions(&self, path: &DocumentPath, message: &str) {
        let mut inner = self.inner.lock().await;
        if let Some(sinks) = inner.subscribers.remove(path) {
            for sink in sinks {
                sink.send(Err(SyncError::subscription(message)));
            }
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(&self, path: &DocumentPath) -> SyncResult<Subscription> {
        if self.fail_subscriptions.load(Ordering::SeqCst) {
            return Err(SyncError::subscription(format!(
                "permission denied for {path}"
            )));
        }

        let (sink, subscription) = Subscription::channel();
        let mut inner = self.inner.lock().await;
        let initial = match inner.documents.get(path) {
            Some(document) => DocumentEvent::Changed(document.clone()),
            None => DocumentEvent::Deleted,
        };
        sink.send(Ok(initial));
        inner.subscribers.entry(path.clone()).or_default().push(sink);
        debug!(path = %path, "memory_store_subscribed");
        Ok(subscription)
    }

    async fn write(&self, path: &DocumentPath, document: StoredDocument) -> SyncResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SyncError::write(format!("permission denied for {path}")));
        }

        let mut inner = self.inner.lock().await;
        inner.documents.insert(path.clone(), document.clone());
        inner.publish(path, &DocumentEvent::Changed(document));
        debug!(path = %path, "memory_store_written");
        Ok(())
    }
}
