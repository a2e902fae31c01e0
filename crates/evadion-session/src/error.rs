//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] evadion_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The frame's document or history belongs to another origin.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Frame content not accessible: {0}")]
pub struct FrameAccessError(pub String);
