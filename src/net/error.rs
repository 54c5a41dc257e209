//! Errors from server round trips

use thiserror::Error;

/// A failed round trip. The caller keeps its previous snapshot.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

impl SyncError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
