//! Error types for the mutation engine.

use prodcfg_model::{FieldKind, ModelError};
use prodcfg_store::StoreError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by mutations and the editor session.
///
/// Missing entities and missing anchors are not errors; those operations
/// resolve to a no-op or an append.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The operation would break a structural rule (e.g. deleting the last
    /// product).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A parameter list mixes variants, or a field is not part of the
    /// parameter's variant.
    #[error("unknown parameter variant: {0}")]
    UnknownVariant(String),

    /// The value kind does not match the field.
    #[error("field `{field}` expects a {expected} value, got {found}")]
    FieldKind {
        field: &'static str,
        expected: FieldKind,
        found: FieldKind,
    },

    /// Restore or export failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ModelError> for EngineError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::UnknownVariant(msg) => Self::UnknownVariant(msg),
            ModelError::FieldKind {
                field,
                expected,
                found,
            } => Self::FieldKind {
                field,
                expected,
                found,
            },
        }
    }
}
