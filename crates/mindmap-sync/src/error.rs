//! Error types for the sync layer.

use mindmap_core::CodecError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Failures surfaced by the sync client, one variant per failure class.
///
/// None of these are fatal: the client turns each into a status message and
/// keeps the local mind map as it was.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Identity establishment failed; saving stays disabled.
    #[error("identity error: {0}")]
    Identity(String),

    /// The change-notification stream failed or was refused.
    #[error("subscription error: {0}")]
    Subscription(String),

    /// A remote payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] CodecError),

    /// A write was refused or could not be delivered.
    #[error("write error: {0}")]
    Write(String),
}

impl SyncError {
    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity(message.into())
    }

    pub fn subscription(message: impl Into<String>) -> Self {
        Self::Subscription(message.into())
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::Write(message.into())
    }
}
