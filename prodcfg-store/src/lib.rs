//! Snapshot store for prodcfg.
//!
//! A [`Snapshot`] is the complete, immutable state of one editor session:
//! - Products in display order, each with its attributes
//! - Parameter groups keyed by `(productId, attributeId)`
//! - [`Tombstone`]s for deleted entities the remote side has not yet seen removed
//! - Id watermarks so identifiers are never reused
//!
//! The [`archive`] module reads and writes the versioned JSON envelope.

pub mod archive;
mod error;
mod snapshot;
mod tombstone;

pub use archive::{export_json, import_json, read_from_path, write_to_path, Archive};
pub use error::{StoreError, StoreResult};
pub use snapshot::Snapshot;
pub use tombstone::Tombstone;
