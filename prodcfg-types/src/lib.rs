//! Core type definitions for prodcfg.
//!
//! This crate defines the small, model-agnostic types shared by every other
//! crate in the workspace:
//! - Entity identifiers (`ProductId`, `AttributeId`, `ParamId`)
//! - Session and sync-pass identifiers (UUID v7)
//! - The per-entity sync lifecycle tag ([`ChangeStatus`])
//! - [`EntityKey`], which addresses any entity in the hierarchy
//! - The fixed `sortOrder` stride used for sibling renumbering

mod ids;
mod key;
mod status;

pub use ids::{AttributeId, ParamId, ProductId, SessionId, SyncId};
pub use key::{EntityKey, GroupKey};
pub use status::ChangeStatus;

/// Distance between consecutive `sortOrder` values after renumbering.
pub const SORT_STRIDE: i64 = 10;

/// Returns the `sortOrder` a sibling at `index` receives after renumbering.
#[must_use]
pub fn sort_order_at(index: usize) -> i64 {
    index as i64 * SORT_STRIDE
}

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, TypesError>;

/// Errors that can occur while parsing core types.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown change status: {0}")]
    UnknownStatus(String),
}
