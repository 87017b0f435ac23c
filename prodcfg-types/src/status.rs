//! Sync lifecycle tag carried by every entity.

use crate::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an entity stands relative to the last successful sync.
///
/// `Synced` is the default so that records restored from a file without an
/// explicit status are treated as clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    /// Created this session, never synced.
    New,
    /// Synced once, modified since.
    Updated,
    /// Removed locally, removal not yet acknowledged by a sync.
    Deleted,
    /// Matches the remote copy.
    #[default]
    Synced,
}

impl ChangeStatus {
    /// Status after a local edit: `new` stays `new`, a synced or updated
    /// entity becomes `updated`, a tombstone stays deleted.
    #[must_use]
    pub const fn touched(self) -> Self {
        match self {
            Self::New => Self::New,
            Self::Deleted => Self::Deleted,
            Self::Updated | Self::Synced => Self::Updated,
        }
    }

    /// True for anything a sync pass still has to send.
    #[must_use]
    pub const fn is_dirty(self) -> bool {
        !matches!(self, Self::Synced)
    }

    /// True if the remote side has never seen this entity.
    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New)
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::Synced => "synced",
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Self::New),
            "updated" => Ok(Self::Updated),
            "deleted" => Ok(Self::Deleted),
            "synced" => Ok(Self::Synced),
            _ => Err(TypesError::UnknownStatus(s.to_string())),
        }
    }
}
