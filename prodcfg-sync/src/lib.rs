//! Sync tracking for prodcfg.
//!
//! - [`collect_changes`] / [`acknowledge`]: derive a [`ChangeSet`] from a
//!   snapshot's statuses and tombstones, and fold a successful push back in
//! - [`SyncAdapter`]: async seam to the remote configuration service
//! - [`SyncCoordinator`]: keeps at most one pass in flight; a failed pass
//!   leaves every status as it was
//! - [`remote`]: the remote snake_case schema and conversions

mod adapter;
mod change;
mod coordinator;
mod error;
pub mod remote;
mod tracker;

pub use adapter::SyncAdapter;
pub use change::{AttributeRecord, Change, ChangeSet, ProductRecord};
pub use coordinator::{PendingSync, SyncConfig, SyncCoordinator, SyncReport};
pub use error::{SyncError, SyncResult};
pub use remote::{ApiAttribute, ApiParam, ApiProduct};
pub use tracker::{acknowledge, collect_changes};
