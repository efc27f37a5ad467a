//! Native egui viewer command.
//!
//! Connects to the configured document store and opens the mind map
//! window. Without a store URL the document lives in-process only.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use eframe::{run_native, NativeOptions};
use tracing::info;

use mindmap_core::sample::{default_expanded, initial_mind_map};
use mindmap_sync::{
    identity_from_config, DocumentStore, MemoryStore, RemoteStore, SyncClient, SyncConfig,
};
use mindmap_viz::{InteractionController, MindMapApp};

#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Base URL of a document host, e.g. http://127.0.0.1:4300.
    #[arg(long, env = "MINDMAP_STORE_URL")]
    pub store_url: Option<String>,

    /// Application instance id used in the document path.
    #[arg(long, env = "MINDMAP_APP_ID")]
    pub app_id: Option<String>,
}

/// Build the sync configuration from the environment plus CLI overrides.
pub fn build_config(args: &ViewArgs) -> SyncConfig {
    let mut config = SyncConfig::load();
    if let Some(url) = &args.store_url {
        config = config.with_store_url(url.clone());
    }
    if let Some(app_id) = &args.app_id {
        config = config.with_app_id(app_id.clone());
    }
    config
}

/// Execute the view command. Blocks until the window is closed.
pub fn execute(args: ViewArgs) -> Result<()> {
    let config = build_config(&args);

    let store: Arc<dyn DocumentStore> = match &config.store_url {
        Some(url) => {
            info!(url = %url, "using_remote_store");
            Arc::new(RemoteStore::new(url.clone()))
        }
        None => {
            println!("⚠️  No store URL configured; changes stay in this process.");
            Arc::new(MemoryStore::new())
        }
    };
    let identity = identity_from_config(&config);

    let path = config.document_path();
    let client = SyncClient::new(&config, store, identity, initial_mind_map());
    let (handle, _task) = mindmap_sync::spawn(client);

    println!("🖼️  Opening mind map {path}");

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_title("Shared Mind Map"),
        ..Default::default()
    };

    let app_handle = handle.clone();
    let result = run_native(
        "Shared Mind Map",
        options,
        Box::new(move |_cc| {
            let controller = InteractionController::new(default_expanded());
            Ok(Box::new(MindMapApp::new(app_handle, controller)))
        }),
    );

    handle.shutdown();

    result.map_err(|e| anyhow::anyhow!("Failed to run viewer: {}", e))
}
