//! Serve command implementation.
//!
//! Runs the document host: `/api/document` for reads and writes and
//! `/api/ws` for change push.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use mindmap_api::{create_api_state, create_app};

/// Execute the serve command. Runs until the process is stopped.
pub async fn execute(host: &str, port: u16) -> Result<()> {
    let state = create_api_state();
    let app = create_app(state);

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {host}:{port}"))?;
    let addr = listener.local_addr()?;

    info!(%addr, "document_host_listening");

    println!();
    println!("🚀 Mind Map Document Host");
    println!("   URL: http://{addr}");
    println!("   API: http://{addr}/api/health");
    println!("   WS:  ws://{addr}/api/ws?path=<document path>");
    println!();
    println!("   Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .await
        .context("Document host stopped unexpectedly")?;

    Ok(())
}
