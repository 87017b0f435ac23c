//! Error types for the entity model.

use crate::FieldKind;
use thiserror::Error;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised when a value does not fit the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A parameter list mixes variants, or a field does not belong to the
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
}
