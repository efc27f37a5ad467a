//! Health check endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::types::{ApiResponse, ApiState, HealthResponse};

/// Handler for GET /api/health
pub async fn health_handler(
    State(state): State<Arc<ApiState>>,
) -> Json<ApiResponse<HealthResponse>> {
    let documents = state.documents.read().await;
    let response = HealthResponse {
        status: "ok".to_string(),
        documents: documents.len(),
    };
    Json(ApiResponse::new(response))
}
