//! Error types for the store layer.

use prodcfg_model::ModelError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while building, importing or exporting a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The archive envelope or its records are not usable.
    #[error("malformed import: {0}")]
    MalformedImport(String),

    /// Every identifier of this kind has been issued.
    #[error("no {0} identifiers left")]
    IdsExhausted(&'static str),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record violates the entity model.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}
