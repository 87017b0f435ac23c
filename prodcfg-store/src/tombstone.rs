use prodcfg_types::{ChangeStatus, EntityKey};
use serde::{Deserialize, Serialize};

/// A removed entity whose deletion has not yet been acknowledged by a sync.
///
/// Only synced (or updated) entities leave a tombstone; an entity the remote
/// side never saw is removed without trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tombstone {
    pub key: EntityKey,
}

impl Tombstone {
    #[must_use]
    pub const fn new(key: EntityKey) -> Self {
        Self { key }
    }

    /// Always [`ChangeStatus::Deleted`].
    #[must_use]
    pub const fn status(&self) -> ChangeStatus {
        ChangeStatus::Deleted
    }

    /// True if this tombstone removes `key` or one of its ancestors.
    #[must_use]
    pub fn covers(&self, key: &EntityKey) -> bool {
        key.is_within(&self.key)
    }
}
