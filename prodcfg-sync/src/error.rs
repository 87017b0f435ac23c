//! Error types for the sync layer.

use prodcfg_types::SyncId;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A sync pass is already outstanding.
    #[error("sync {0} is still in flight")]
    InFlight(SyncId),

    /// `finish` was called with a pass this coordinator did not start.
    #[error("unknown sync pass: {0}")]
    UnknownSync(SyncId),

    /// The remote side rejected or failed the request.
    #[error("remote error: {0}")]
    Remote(String),

    /// Protocol error (invalid remote data).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
