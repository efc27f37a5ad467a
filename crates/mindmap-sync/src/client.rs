//! The sync client: identity, subscription, snapshot application and saves.
//!
//! The remote document always wins. Every snapshot replaces the local mind
//! map wholesale; saves do not touch local state and only take effect
//! when the store echoes them back as a change notification.

use std::fmt;
use std::sync::Arc;

use mindmap_core::{decode, encode, MindMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::driver::SyncView;
use crate::error::{SyncError, SyncResult};
use crate::identity::IdentityProvider;
use crate::store::{DocumentEvent, DocumentPath, DocumentStore, StoredDocument, Subscription};

pub const MSG_LOADED: &str = "Mind map loaded.";
pub const MSG_SAVED: &str = "Mind map saved.";
pub const MSG_BOOTSTRAPPED: &str = "No mind map found; the initial map was saved.";
pub const MSG_NOT_READY: &str = "Cannot save: sync not initialized or user not signed in.";

/// Lifecycle of the client against the singleton document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Uninitialized,
    Authenticating,
    Subscribed,
    Loading,
    Idle,
    Error,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncState::Uninitialized => "uninitialized",
            SyncState::Authenticating => "authenticating",
            SyncState::Subscribed => "subscribed",
            SyncState::Loading => "loading",
            SyncState::Idle => "idle",
            SyncState::Error => "error",
        };
        f.write_str(name)
    }
}

/// Outcome of the last operation, as shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Session bookkeeping owned by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSession {
    /// Set once identity establishment succeeds.
    pub caller_id: Option<String>,
    pub status: SyncStatus,
    pub message: String,
}

pub struct SyncClient {
    path: DocumentPath,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    session: SyncSession,
    state: SyncState,
    subscribed: bool,
    synced: bool,
    mind_map: MindMap,
    revision: u64,
    saves: u64,
}

impl SyncClient {
    /// `initial` is the local mind map until the first snapshot arrives, and
    /// the content written when the shared document does not exist yet.
    pub fn new(
        config: &SyncConfig,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        initial: MindMap,
    ) -> Self {
        Self {
            path: config.document_path(),
            store,
            identity,
            session: SyncSession::default(),
            state: SyncState::Uninitialized,
            subscribed: false,
            synced: false,
            mind_map: initial,
            revision: 0,
            saves: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn path(&self) -> &DocumentPath {
        &self.path
    }

    pub fn mind_map(&self) -> &MindMap {
        &self.mind_map
    }

    pub fn session(&self) -> &SyncSession {
        &self.session
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn caller_id(&self) -> Option<&str> {
        self.session.caller_id.as_deref()
    }

    /// Bumped every time a snapshot replaces the local mind map.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of saves attempted, including rejected and failed ones.
    pub fn saves(&self) -> u64 {
        self.saves
    }

    /// Identity and subscription are both established.
    pub fn is_ready(&self) -> bool {
        self.session.caller_id.is_some() && self.subscribed
    }

    /// An identity handshake, the initial load, or a write is in flight.
    pub fn is_busy(&self) -> bool {
        match self.state {
            SyncState::Uninitialized | SyncState::Authenticating | SyncState::Loading => true,
            SyncState::Subscribed => !self.synced,
            SyncState::Idle | SyncState::Error => false,
        }
    }

    pub fn view(&self) -> SyncView {
        SyncView {
            mind_map: Arc::new(self.mind_map.clone()),
            state: self.state,
            status: self.session.status,
            message: self.session.message.clone(),
            caller_id: self.session.caller_id.clone(),
            ready: self.is_ready(),
            busy: self.is_busy(),
            revision: self.revision,
            saves: self.saves,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Establish identity, then open the change stream for the document.
    ///
    /// On failure the client stays usable locally; the error is recorded in
    /// the session and returned.
    pub async fn initialize(&mut self) -> SyncResult<Subscription> {
        self.state = SyncState::Authenticating;
        self.set_status(SyncStatus::Loading, "Signing in…");

        let caller_id = match self.identity.establish_identity().await {
            Ok(caller_id) => caller_id,
            Err(e) => {
                error!(error = %e, "identity_failed");
                self.fail(format!("Sign-in failed: {e}"));
                return Err(e);
            }
        };
        info!(caller_id = %caller_id, "identity_established");
        self.session.caller_id = Some(caller_id);

        match self.store.subscribe(&self.path).await {
            Ok(subscription) => {
                info!(path = %self.path, "subscribed");
                self.subscribed = true;
                self.state = SyncState::Subscribed;
                Ok(subscription)
            }
            Err(e) => {
                error!(path = %self.path, error = %e, "subscribe_failed");
                self.fail(format!("Realtime sync error: {e}"));
                Err(e)
            }
        }
    }

    /// Apply one change notification from the store.
    ///
    /// A missing document is bootstrapped with the local mind map. A
    /// snapshot that fails to decode leaves the local mind map untouched.
    pub async fn on_remote_change(&mut self, event: DocumentEvent) -> SyncResult<()> {
        self.synced = true;
        match event {
            DocumentEvent::Deleted => {
                info!(path = %self.path, "document_missing_bootstrapping");
                let initial = self.mind_map.clone();
                self.save(&initial).await?;
                self.session.message = MSG_BOOTSTRAPPED.to_string();
                Ok(())
            }
            DocumentEvent::Changed(document) => match decode(&document.mind_map) {
                Ok(mind_map) => {
                    self.mind_map = mind_map;
                    self.revision += 1;
                    self.state = SyncState::Idle;
                    self.set_status(SyncStatus::Success, MSG_LOADED);
                    debug!(
                        revision = self.revision,
                        last_updated = document.last_updated,
                        nodes = self.mind_map.node_count(),
                        "snapshot_applied"
                    );
                    Ok(())
                }
                Err(e) => {
                    warn!(error = %e, "snapshot_decode_failed");
                    self.fail(format!("Failed to load the mind map: {e}"));
                    Err(SyncError::Decode(e))
                }
            },
        }
    }

    /// The change stream failed. No retry; a restart is required.
    pub fn on_subscription_error(&mut self, error: SyncError) {
        error!(path = %self.path, error = %error, "subscription_failed");
        self.subscribed = false;
        self.fail(format!("Realtime sync error: {error}"));
    }

    /// Encode and write `map` to the shared document.
    ///
    /// Rejected with a write error before identity and subscription are
    /// established. Local state is not modified; the store's change
    /// notification carries the result back.
    pub async fn save(&mut self, map: &MindMap) -> SyncResult<()> {
        let payload = self.begin_save(map)?;
        self.finish_save(payload).await
    }

    /// First half of [`save`](Self::save): check readiness, encode, and
    /// enter the loading state. Returns the payload to write.
    pub fn begin_save(&mut self, map: &MindMap) -> SyncResult<String> {
        self.saves += 1;

        if !self.is_ready() {
            warn!("save_rejected_not_ready");
            self.set_status(SyncStatus::Error, MSG_NOT_READY);
            return Err(SyncError::write(MSG_NOT_READY));
        }

        let payload = match encode(map) {
            Ok(payload) => payload,
            Err(e) => {
                self.fail(format!("Failed to save the mind map: {e}"));
                return Err(SyncError::write(e.to_string()));
            }
        };

        self.state = SyncState::Loading;
        self.set_status(SyncStatus::Loading, "Saving…");
        debug!(path = %self.path, bytes = payload.len(), "save_started");
        Ok(payload)
    }

    /// Second half of [`save`](Self::save): write a payload from
    /// [`begin_save`](Self::begin_save) and record the outcome.
    pub async fn finish_save(&mut self, payload: String) -> SyncResult<()> {
        let result = self
            .store
            .write(&self.path, StoredDocument::stamped(payload))
            .await;
        match result {
            Ok(()) => {
                self.state = SyncState::Idle;
                self.set_status(SyncStatus::Success, MSG_SAVED);
                info!(path = %self.path, "saved");
                Ok(())
            }
            Err(e) => {
                error!(path = %self.path, error = %e, "save_failed");
                self.fail(format!("Failed to save the mind map: {e}"));
                Err(e)
            }
        }
    }

    fn set_status(&mut self, status: SyncStatus, message: impl Into<String>) {
        self.session.status = status;
        self.session.message = message.into();
    }

    fn fail(&mut self, message: String) {
        self.state = SyncState::Error;
        self.set_status(SyncStatus::Error, message);
    }
}

impl fmt::Debug for SyncClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncClient")
            .field("path", &self.path)
            .field("state", &self.state)
            .field("session", &self.session)
            .field("subscribed", &self.subscribed)
            .field("revision", &self.revision)
            .field("saves", &self.saves)
            .finish()
    }
}
