//! REST + WebSocket document host for the shared mind map.
//!
//! A small realtime document store: documents are addressed by path, each
//! write replaces the document and is pushed to every WebSocket subscriber
//! of that path in commit order. `mindmap_sync::RemoteStore` is its client.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check with document count
//! - `GET /api/document?path=...` - Current document
//! - `PUT /api/document?path=...` - Replace a document (server-stamped)
//! - `DELETE /api/document?path=...` - Remove a document
//! - `GET /api/ws?path=...` - WebSocket change stream for one document
//!
//! ## Usage
//!
//! ```rust,no_run
//! use mindmap_api::{create_api_state, create_app};
//!
//! # async fn run() -> std::io::Result<()> {
//! let app = create_app(create_api_state());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:4300").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod routes;
mod types;
mod ws;

pub use routes::{create_api_router, create_app};
pub use types::{
    ApiResponse, ApiState, DocumentChange, DocumentQuery, ErrorResponse, HealthResponse,
    WriteDocumentRequest,
};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

/// Buffered changes per subscriber before it is considered lagged.
const CHANGE_BUFFER: usize = 100;

/// Create an empty document host state.
pub fn create_api_state() -> Arc<ApiState> {
    let (tx, _) = broadcast::channel(CHANGE_BUFFER);
    Arc::new(ApiState {
        documents: RwLock::new(HashMap::new()),
        tx,
    })
}
