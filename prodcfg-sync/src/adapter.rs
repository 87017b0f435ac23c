//! The seam to the remote configuration service.

use crate::{ApiProduct, ChangeSet, SyncResult};
use async_trait::async_trait;

/// Transport to the remote service. Implementations own retries, timeouts
/// and the HTTP (or other) mapping of each [`crate::Change`].
#[async_trait]
pub trait SyncAdapter: Send + Sync {
    /// Applies every change remotely, in order. Any error means the whole
    /// set counts as not synced.
    async fn push(&self, changes: &ChangeSet) -> SyncResult<()>;

    /// Returns the full remote product tree.
    async fn fetch(&self) -> SyncResult<Vec<ApiProduct>>;
}
