//! Integration tests for the sync client and its driver against the
//! in-process store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use mindmap_core::sample::initial_mind_map;
use mindmap_core::{encode, DetailItem, MindMap, Node};
use mindmap_sync::client::{MSG_BOOTSTRAPPED, MSG_LOADED, MSG_NOT_READY, MSG_SAVED};
use mindmap_sync::{
    spawn, AnonymousIdentity, DocumentEvent, DocumentPath, DocumentStore, IdentityProvider,
    MemoryStore, StoredDocument, Subscription, SyncClient, SyncConfig, SyncError, SyncResult,
    SyncState, SyncStatus,
};

// =============================================================================
// Helpers
// =============================================================================

struct FailingIdentity;

#[async_trait]
impl IdentityProvider for FailingIdentity {
    async fn establish_identity(&self) -> SyncResult<String> {
        Err(SyncError::identity("auth service unavailable"))
    }
}

/// Holds every write until a permit is released.
struct GatedStore {
    inner: Arc<MemoryStore>,
    gate: Semaphore,
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn subscribe(&self, path: &DocumentPath) -> SyncResult<Subscription> {
        self.inner.subscribe(path).await
    }

    async fn write(&self, path: &DocumentPath, document: StoredDocument) -> SyncResult<()> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| SyncError::write(e.to_string()))?;
        self.inner.write(path, document).await
    }
}

fn config() -> SyncConfig {
    SyncConfig::default()
}

fn path() -> DocumentPath {
    config().document_path()
}

fn client_with(store: &Arc<MemoryStore>, initial: MindMap) -> SyncClient {
    SyncClient::new(
        &config(),
        store.clone(),
        Arc::new(AnonymousIdentity::new()),
        initial,
    )
}

fn small_map(label: &str) -> MindMap {
    MindMap::new(
        label,
        [Node::new("root", label).with_details([
            DetailItem::text("A"),
            DetailItem::image("http://x/i.png", "y", "z"),
            DetailItem::text("B"),
        ])],
    )
}

async fn next_event(subscription: &mut Subscription) -> DocumentEvent {
    subscription
        .next()
        .await
        .expect("subscription ended")
        .expect("subscription error")
}

/// Initialize and run the bootstrap round-trip so the client is synced.
async fn synced_client(store: &Arc<MemoryStore>, initial: MindMap) -> (SyncClient, Subscription) {
    let mut client = client_with(store, initial);
    let mut subscription = client.initialize().await.unwrap();
    let first = next_event(&mut subscription).await;
    client.on_remote_change(first).await.unwrap();
    if client.revision() == 0 {
        let echo = next_event(&mut subscription).await;
        client.on_remote_change(echo).await.unwrap();
    }
    (client, subscription)
}

// =============================================================================
// Client protocol
// =============================================================================

#[tokio::test]
async fn missing_document_is_bootstrapped_with_the_default_map() {
    let store = Arc::new(MemoryStore::new());
    let mut client = client_with(&store, initial_mind_map());

    let mut subscription = client.initialize().await.unwrap();
    assert_eq!(client.state(), SyncState::Subscribed);
    assert!(client.is_ready());
    assert!(client.is_busy());

    let first = next_event(&mut subscription).await;
    assert_eq!(first, DocumentEvent::Deleted);
    client.on_remote_change(first).await.unwrap();
    assert_eq!(client.session().message, MSG_BOOTSTRAPPED);
    assert_eq!(client.revision(), 0);

    let stored = store.get(&path()).await.expect("bootstrap write");
    assert_eq!(stored.mind_map, encode(&initial_mind_map()).unwrap());

    let echo = next_event(&mut subscription).await;
    assert_eq!(echo, DocumentEvent::Changed(stored));
    client.on_remote_change(echo).await.unwrap();

    assert_eq!(client.mind_map(), &initial_mind_map());
    assert_eq!(client.revision(), 1);
    assert_eq!(client.state(), SyncState::Idle);
    assert_eq!(client.session().status, SyncStatus::Success);
    assert_eq!(client.session().message, MSG_LOADED);
    assert!(!client.is_busy());
}

#[tokio::test]
async fn existing_document_replaces_local_state() {
    let store = Arc::new(MemoryStore::new());
    let remote = small_map("remote");
    store
        .write(&path(), StoredDocument::new(encode(&remote).unwrap(), 1))
        .await
        .unwrap();

    let (client, _subscription) = synced_client(&store, small_map("local")).await;
    assert_eq!(client.mind_map(), &remote);
    assert_eq!(client.revision(), 1);
}

#[tokio::test]
async fn last_remote_write_wins() {
    let store = Arc::new(MemoryStore::new());
    let (mut client, mut subscription) = synced_client(&store, small_map("initial")).await;

    let first = small_map("first");
    let second = small_map("second");
    for (n, map) in [&first, &second].into_iter().enumerate() {
        store
            .write(&path(), StoredDocument::new(encode(map).unwrap(), n as u64))
            .await
            .unwrap();
    }

    for _ in 0..2 {
        let event = next_event(&mut subscription).await;
        client.on_remote_change(event).await.unwrap();
    }
    assert_eq!(client.mind_map(), &second);
    assert_eq!(client.revision(), 3);
}

#[tokio::test]
async fn save_only_takes_effect_through_the_change_notification() {
    let store = Arc::new(MemoryStore::new());
    let (mut client, mut subscription) = synced_client(&store, small_map("before")).await;

    let after = small_map("after");
    client.save(&after).await.unwrap();
    assert_eq!(client.session().message, MSG_SAVED);
    assert_eq!(client.mind_map(), &small_map("before"));

    let echo = next_event(&mut subscription).await;
    client.on_remote_change(echo).await.unwrap();
    assert_eq!(client.mind_map(), &after);
}

#[tokio::test]
async fn save_before_initialization_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let mut client = client_with(&store, small_map("local"));

    let result = client.save(&small_map("local")).await;
    assert!(matches!(result, Err(SyncError::Write(_))));
    assert_eq!(client.session().status, SyncStatus::Error);
    assert_eq!(client.session().message, MSG_NOT_READY);
    assert!(store.get(&path()).await.is_none());
}

#[tokio::test]
async fn malformed_snapshot_keeps_the_local_map() {
    let store = Arc::new(MemoryStore::new());
    let (mut client, mut subscription) = synced_client(&store, small_map("good")).await;

    store
        .write(&path(), StoredDocument::new("{ not json", 9))
        .await
        .unwrap();
    let event = next_event(&mut subscription).await;
    let result = client.on_remote_change(event).await;

    assert!(matches!(result, Err(SyncError::Decode(_))));
    assert_eq!(client.mind_map(), &small_map("good"));
    assert_eq!(client.session().status, SyncStatus::Error);
    assert_eq!(client.state(), SyncState::Error);
    // malformed remote content is not overwritten automatically
    assert_eq!(store.get(&path()).await.unwrap().mind_map, "{ not json");
}

#[tokio::test]
async fn identity_failure_leaves_the_client_local_only() {
    let store = Arc::new(MemoryStore::new());
    let mut client = SyncClient::new(
        &config(),
        store.clone(),
        Arc::new(FailingIdentity),
        small_map("local"),
    );

    let result = client.initialize().await;
    assert!(matches!(result, Err(SyncError::Identity(_))));
    assert_eq!(client.state(), SyncState::Error);
    assert!(client.caller_id().is_none());
    assert!(!client.is_ready());
    assert!(client.session().message.starts_with("Sign-in failed"));

    assert!(matches!(
        client.save(&small_map("local")).await,
        Err(SyncError::Write(_))
    ));
    assert_eq!(store.subscriber_count(&path()).await, 0);
}

#[tokio::test]
async fn subscription_failure_is_reported() {
    let store = Arc::new(MemoryStore::new());
    store.fail_subscriptions(true);
    let mut client = client_with(&store, small_map("local"));

    let result = client.initialize().await;
    assert!(matches!(result, Err(SyncError::Subscription(_))));
    assert!(client.caller_id().is_some());
    assert!(!client.is_ready());
    assert!(client.session().message.starts_with("Realtime sync error"));
}

#[tokio::test]
async fn failed_write_preserves_state_and_allows_retry() {
    let store = Arc::new(MemoryStore::new());
    let (mut client, _subscription) = synced_client(&store, small_map("kept")).await;

    store.fail_writes(true);
    let result = client.save(&small_map("lost")).await;
    assert!(matches!(result, Err(SyncError::Write(_))));
    assert_eq!(client.session().status, SyncStatus::Error);
    assert_eq!(client.mind_map(), &small_map("kept"));
    assert!(!client.is_busy());

    store.fail_writes(false);
    client.save(&small_map("retried")).await.unwrap();
    assert_eq!(client.session().status, SyncStatus::Success);
}

#[tokio::test]
async fn every_save_attempt_is_counted() {
    let store = Arc::new(MemoryStore::new());
    let (mut client, _subscription) = synced_client(&store, small_map("kept")).await;
    let before = client.saves();

    store.fail_writes(true);
    assert!(client.save(&small_map("a")).await.is_err());
    let first = client.view();
    assert!(client.save(&small_map("a")).await.is_err());
    let second = client.view();

    assert_eq!(first.message, second.message);
    assert_eq!(first.revision, second.revision);
    assert_eq!(first.saves, before + 1);
    assert_eq!(second.saves, before + 2);
}

#[tokio::test]
async fn stream_failure_disables_saving() {
    let store = Arc::new(MemoryStore::new());
    let (mut client, _subscription) = synced_client(&store, small_map("m")).await;

    client.on_subscription_error(SyncError::subscription("denied"));
    assert!(!client.is_ready());
    assert_eq!(client.state(), SyncState::Error);
    assert!(client.save(&small_map("m")).await.is_err());
}

// =============================================================================
// Driver
// =============================================================================

#[tokio::test]
async fn driver_bootstraps_and_publishes_views() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn(client_with(&store, initial_mind_map()));

    let view = handle
        .wait_for(|view| view.revision >= 1)
        .await
        .expect("driver stopped");
    assert_eq!(*view.mind_map, initial_mind_map());
    assert!(view.ready);
    assert!(!view.busy);
    assert_eq!(view.status, SyncStatus::Success);
    assert!(view.caller_id.is_some());
}

#[tokio::test]
async fn saves_propagate_to_every_driver() {
    let store = Arc::new(MemoryStore::new());
    let (alice, _a) = spawn(client_with(&store, small_map("initial")));
    alice.wait_for(|view| view.revision >= 1).await.unwrap();

    let (bob, _b) = spawn(client_with(&store, small_map("bob's local")));
    let bob_view = bob.wait_for(|view| view.revision >= 1).await.unwrap();
    assert_eq!(*bob_view.mind_map, small_map("initial"));

    let edited = small_map("edited");
    assert!(alice.save(edited.clone()));

    let alice_view = alice
        .wait_for(|view| *view.mind_map == edited)
        .await
        .unwrap();
    assert_eq!(alice_view.revision, 2);
    let bob_view = bob.wait_for(|view| *view.mind_map == edited).await.unwrap();
    assert_eq!(bob_view.revision, 2);
}

#[tokio::test]
async fn driver_reports_stream_failures() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn(client_with(&store, small_map("m")));
    handle.wait_for(|view| view.revision >= 1).await.unwrap();

    store.break_subscriptions(&path(), "revoked").await;
    let view = handle
        .wait_for(|view| view.state == SyncState::Error)
        .await
        .unwrap();
    assert!(!view.ready);
    assert!(view.message.contains("revoked"));
    assert_eq!(*view.mind_map, small_map("m"));
}

#[tokio::test]
async fn shutdown_releases_the_subscription() {
    let store = Arc::new(MemoryStore::new());
    let (handle, task) = spawn(client_with(&store, small_map("m")));
    handle.wait_for(|view| view.revision >= 1).await.unwrap();
    assert_eq!(store.subscriber_count(&path()).await, 1);

    handle.shutdown();
    task.await.unwrap();
    assert_eq!(store.subscriber_count(&path()).await, 0);
    assert!(!handle.save(small_map("late")));
}

#[tokio::test]
async fn driver_shows_loading_while_a_write_is_pending() {
    let inner = Arc::new(MemoryStore::new());
    inner
        .write(&path(), StoredDocument::stamped(encode(&small_map("m")).unwrap()))
        .await
        .unwrap();
    let store = Arc::new(GatedStore {
        inner: inner.clone(),
        gate: Semaphore::new(0),
    });
    let client = SyncClient::new(
        &config(),
        store.clone(),
        Arc::new(AnonymousIdentity::new()),
        small_map("local"),
    );
    let (handle, _task) = spawn(client);
    handle.wait_for(|view| view.revision >= 1).await.unwrap();

    assert!(handle.save(small_map("edited")));
    let pending = handle
        .wait_for(|view| view.state == SyncState::Loading)
        .await
        .unwrap();
    assert!(pending.busy);
    assert_eq!(pending.status, SyncStatus::Loading);
    assert_eq!(pending.message, "Saving…");

    store.gate.add_permits(1);
    let done = handle
        .wait_for(|view| *view.mind_map == small_map("edited"))
        .await
        .unwrap();
    assert!(!done.busy);
}

#[tokio::test]
async fn repeated_identical_failures_publish_distinct_views() {
    let store = Arc::new(MemoryStore::new());
    let (handle, _task) = spawn(client_with(&store, small_map("m")));
    let start = handle.wait_for(|view| view.revision >= 1).await.unwrap();

    store.fail_writes(true);
    assert!(handle.save(small_map("x")));
    let first = handle
        .wait_for(|view| view.saves == start.saves + 1 && !view.busy)
        .await
        .unwrap();
    assert_eq!(first.status, SyncStatus::Error);

    assert!(handle.save(small_map("x")));
    let second = handle
        .wait_for(|view| view.saves == start.saves + 2 && !view.busy)
        .await
        .unwrap();
    assert_eq!(second.status, SyncStatus::Error);
    assert_eq!(second.message, first.message);
    assert_ne!(second, first);
}
