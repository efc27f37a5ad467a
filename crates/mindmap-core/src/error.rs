//! Error types for the mind map codec.

use thiserror::Error;

use crate::model::NodeId;

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a mind map payload.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The mind map could not be serialized.
    #[error("failed to encode mind map: {0}")]
    Encode(#[source] serde_json::Error),

    /// The payload is not well-formed structured data of the expected shape.
    #[error("malformed mind map payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// Two nodes in the same tree share an id.
    #[error("duplicate node id: {id}")]
    DuplicateNodeId { id: NodeId },
}
