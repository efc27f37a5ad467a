//! API route handlers.

mod document;
mod health;

pub(crate) use document::document_path;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::types::ApiState;
use crate::ws::ws_handler;

/// Create the API router with all endpoints, unprefixed.
pub fn create_api_router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health::health_handler))
        // Documents
        .route(
            "/document",
            get(document::get_document_handler)
                .put(document::put_document_handler)
                .delete(document::delete_document_handler),
        )
        // WebSocket
        .route("/ws", get(ws_handler))
        // Request tracing (enable with RUST_LOG=tower_http=info or higher)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// The API mounted at `/api`, as served by the binary.
pub fn create_app(state: Arc<ApiState>) -> Router {
    Router::new().nest("/api", create_api_router(state))
}
