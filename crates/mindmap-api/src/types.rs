//! API types and DTOs.

use std::collections::HashMap;

use mindmap_sync::{store::now_millis, DocumentPath, StoredDocument};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

/// Shared application state for the API.
pub struct ApiState {
    /// Committed documents by path.
    pub documents: RwLock<HashMap<DocumentPath, StoredDocument>>,
    /// Every committed change, in commit order.
    pub tx: broadcast::Sender<DocumentChange>,
}

impl ApiState {
    pub async fn get(&self, path: &DocumentPath) -> Option<StoredDocument> {
        self.documents.read().await.get(path).cloned()
    }

    /// Store and broadcast under the write lock so commit order and
    /// broadcast order agree.
    pub async fn put(&self, path: DocumentPath, document: StoredDocument) {
        let mut documents = self.documents.write().await;
        documents.insert(path.clone(), document.clone());
        let _ = self.tx.send(DocumentChange {
            path,
            document: Some(document),
        });
    }

    /// Remove and broadcast. Returns whether the document existed.
    pub async fn delete(&self, path: &DocumentPath) -> bool {
        let mut documents = self.documents.write().await;
        let existed = documents.remove(path).is_some();
        if existed {
            let _ = self.tx.send(DocumentChange {
                path: path.clone(),
                document: None,
            });
        }
        existed
    }
}

/// One committed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub path: DocumentPath,
    /// `None` when the document was removed.
    pub document: Option<StoredDocument>,
}

/// Response wrapper with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data.
    pub data: T,
    /// Unix timestamp in milliseconds.
    pub timestamp: u64,
}

impl<T> ApiResponse<T> {
    /// Create a new API response with current timestamp.
    pub fn new(data: T) -> Self {
        Self {
            data,
            timestamp: now_millis(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Number of stored documents.
    pub documents: usize,
}

/// Error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// Query parameters addressing one document.
#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    /// Document path.
    pub path: String,
}

/// Body of `PUT /api/document`.
///
/// Any client-supplied `lastUpdated` is ignored; the host stamps the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteDocumentRequest {
    pub mind_map: String,
}
