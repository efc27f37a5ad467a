//! Local interaction state between the user and the sync task.

use std::fmt;

use mindmap_core::{ExpandState, MindMap};
use mindmap_sync::{SyncCommand, SyncStatus, SyncView};
use tracing::debug;

/// Why a save request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRejected {
    /// Sign-in, the initial load or another save is still in flight.
    Busy,
    /// Identity or subscription is not established.
    NotReady,
}

impl fmt::Display for SaveRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveRejected::Busy => write!(f, "an operation is already in progress"),
            SaveRejected::NotReady => write!(f, "not connected to the document store"),
        }
    }
}

impl std::error::Error for SaveRejected {}

/// The parts of a view that move the controller forward.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Seen {
    revision: u64,
    saves: u64,
    status: SyncStatus,
    message: String,
    busy: bool,
    ready: bool,
}

impl From<&SyncView> for Seen {
    fn from(view: &SyncView) -> Self {
        Self {
            revision: view.revision,
            saves: view.saves,
            status: view.status,
            message: view.message.clone(),
            busy: view.busy,
            ready: view.ready,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    expand: ExpandState,
    loading: bool,
    ready: bool,
    status: SyncStatus,
    message: String,
    caller_id: Option<String>,
    seen: Option<Seen>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(ExpandState::new())
    }
}

impl InteractionController {
    /// Starts busy and not ready until the first view arrives.
    pub fn new(expand: ExpandState) -> Self {
        Self {
            expand,
            loading: true,
            ready: false,
            status: SyncStatus::Idle,
            message: String::new(),
            caller_id: None,
            seen: None,
        }
    }

    pub fn expand(&self) -> &ExpandState {
        &self.expand
    }

    /// Flip one node open or closed. Purely local.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.expand.toggle(id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn caller_id(&self) -> Option<&str> {
        self.caller_id.as_deref()
    }

    pub fn can_save(&self) -> bool {
        self.ready && !self.loading
    }

    /// Take in the latest published view.
    ///
    /// Views identical to the previous one are ignored, so a save that
    /// was just accepted stays busy until the sync task reports progress.
    /// Every finished save bumps `saves`, so a retry that fails exactly like
    /// the last attempt still counts as progress.
    pub fn observe(&mut self, view: &SyncView) {
        let seen = Seen::from(view);
        if self.seen.as_ref() == Some(&seen) {
            return;
        }

        self.loading = view.busy;
        self.ready = view.ready;
        self.status = view.status;
        self.message = view.message.clone();
        self.caller_id = view.caller_id.clone();
        self.seen = Some(seen);
    }

    /// Build the save command for `map`, or refuse it.
    pub fn request_save(&mut self, map: &MindMap) -> Result<SyncCommand, SaveRejected> {
        if !self.ready {
            debug!("save_rejected_not_ready");
            return Err(SaveRejected::NotReady);
        }
        if self.loading {
            debug!("save_rejected_busy");
            return Err(SaveRejected::Busy);
        }

        self.loading = true;
        Ok(SyncCommand::Save(map.clone()))
    }
}
