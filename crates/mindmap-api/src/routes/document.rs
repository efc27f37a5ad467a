//! Document endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mindmap_sync::{DocumentPath, StoredDocument};
use serde_json::json;
use tracing::info;

use crate::types::{ApiResponse, ApiState, DocumentQuery, ErrorResponse, WriteDocumentRequest};

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse::new(ErrorResponse::new(code, message))),
    )
        .into_response()
}

pub(crate) fn document_path(query: &DocumentQuery) -> Result<DocumentPath, Response> {
    let path = query.path.trim();
    if path.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "MISSING_PATH",
            "document path is required",
        ));
    }
    Ok(DocumentPath::new(path))
}

/// GET /api/document?path=... - Current content of one document.
pub async fn get_document_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DocumentQuery>,
) -> Response {
    let path = match document_path(&query) {
        Ok(path) => path,
        Err(response) => return response,
    };

    match state.get(&path).await {
        Some(document) => (StatusCode::OK, Json(ApiResponse::new(document))).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("no document at {path}"),
        ),
    }
}

/// PUT /api/document?path=... - Replace a document, stamped with server time.
pub async fn put_document_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DocumentQuery>,
    Json(request): Json<WriteDocumentRequest>,
) -> Response {
    let path = match document_path(&query) {
        Ok(path) => path,
        Err(response) => return response,
    };

    let document = StoredDocument::stamped(request.mind_map);
    info!(
        path = %path,
        bytes = document.mind_map.len(),
        last_updated = document.last_updated,
        "document_written"
    );
    state.put(path, document.clone()).await;
    (StatusCode::OK, Json(ApiResponse::new(document))).into_response()
}

/// DELETE /api/document?path=... - Remove a document.
pub async fn delete_document_handler(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<DocumentQuery>,
) -> Response {
    let path = match document_path(&query) {
        Ok(path) => path,
        Err(response) => return response,
    };

    if state.delete(&path).await {
        info!(path = %path, "document_deleted");
        (
            StatusCode::OK,
            Json(ApiResponse::new(json!({ "deleted": path.as_str() }))),
        )
            .into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("no document at {path}"),
        )
    }
}
