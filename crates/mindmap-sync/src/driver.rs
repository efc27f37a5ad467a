//! Single-task event loop around a [`SyncClient`].
//!
//! User commands and store events are handled one at a time by the same
//! task. After each step the loop publishes a [`SyncView`] on a watch
//! channel for the UI to read.

use std::future;
use std::sync::Arc;

use mindmap_core::MindMap;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::client::{SyncClient, SyncState, SyncStatus};
use crate::error::{SyncError, SyncResult};
use crate::store::{DocumentEvent, Subscription};

/// Requests from the UI to the sync task.
#[derive(Debug, Clone)]
pub enum SyncCommand {
    Save(MindMap),
    Shutdown,
}

/// Point-in-time snapshot of the client for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncView {
    pub mind_map: Arc<MindMap>,
    pub state: SyncState,
    pub status: SyncStatus,
    pub message: String,
    pub caller_id: Option<String>,
    /// Identity and subscription are established.
    pub ready: bool,
    /// Sign-in, initial load or a write is in flight.
    pub busy: bool,
    /// Number of snapshots applied so far.
    pub revision: u64,
    /// Number of saves attempted so far. Moves on every finished save, even
    /// one that fails exactly like the previous attempt.
    pub saves: u64,
}

/// Handle to a running sync task.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    commands: mpsc::UnboundedSender<SyncCommand>,
    view: watch::Receiver<SyncView>,
}

impl SyncHandle {
    /// Queue a command. Returns `false` if the task has stopped.
    pub fn send(&self, command: SyncCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn save(&self, map: MindMap) -> bool {
        self.send(SyncCommand::Save(map))
    }

    pub fn shutdown(&self) {
        let _ = self.commands.send(SyncCommand::Shutdown);
    }

    /// Latest published view.
    pub fn view(&self) -> SyncView {
        self.view.borrow().clone()
    }

    /// A receiver that is notified on every published view.
    pub fn watch(&self) -> watch::Receiver<SyncView> {
        self.view.clone()
    }

    /// Wait until a published view satisfies `predicate`.
    ///
    /// `None` if the task stops first.
    pub async fn wait_for(&self, predicate: impl FnMut(&SyncView) -> bool) -> Option<SyncView> {
        let mut rx = self.view.clone();
        let view = rx.wait_for(predicate).await.ok()?;
        Some(view.clone())
    }
}

/// Start the sync task on the current tokio runtime.
pub fn spawn(client: SyncClient) -> (SyncHandle, JoinHandle<()>) {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (view_tx, view_rx) = watch::channel(client.view());
    let task = tokio::spawn(run(client, commands_rx, view_tx));
    (
        SyncHandle {
            commands: commands_tx,
            view: view_rx,
        },
        task,
    )
}

async fn run(
    mut client: SyncClient,
    mut commands: mpsc::UnboundedReceiver<SyncCommand>,
    view: watch::Sender<SyncView>,
) {
    let mut subscription = match client.initialize().await {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            warn!(error = %e, "sync_running_local_only");
            None
        }
    };
    view.send_replace(client.view());

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(SyncCommand::Save(map)) => {
                    let result = match client.begin_save(&map) {
                        Ok(payload) => {
                            // show the loading state while the write runs
                            view.send_replace(client.view());
                            client.finish_save(payload).await
                        }
                        Err(e) => Err(e),
                    };
                    if let Err(e) = result {
                        warn!(error = %e, "save_command_failed");
                    }
                }
                Some(SyncCommand::Shutdown) | None => break,
            },

            event = next_event(&mut subscription) => match event {
                Some(Ok(event)) => {
                    if let Err(e) = client.on_remote_change(event).await {
                        warn!(error = %e, "remote_change_failed");
                    }
                }
                Some(Err(e)) => {
                    client.on_subscription_error(e);
                    subscription = None;
                }
                None => {
                    client.on_subscription_error(SyncError::subscription("change stream ended"));
                    subscription = None;
                }
            },
        }
        view.send_replace(client.view());
    }

    if let Some(subscription) = subscription.take() {
        subscription.cancel();
    }
    info!(path = %client.path(), "sync_stopped");
}

/// Next store event, or never when there is no live subscription.
async fn next_event(subscription: &mut Option<Subscription>) -> Option<SyncResult<DocumentEvent>> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => future::pending().await,
    }
}
