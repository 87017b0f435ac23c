//! At-most-one-in-flight sync orchestration.
//!
//! A pass is `begin` → [`SyncAdapter::push`] → `finish`. Local edits may
//! continue between `begin` and `finish`; `finish` reconciles against
//! whatever the snapshot has become.

use crate::{acknowledge, collect_changes, remote, ChangeSet, SyncAdapter, SyncError, SyncResult};
use prodcfg_engine::EditorSession;
use prodcfg_store::Snapshot;
use prodcfg_types::SyncId;
use tracing::{debug, info, warn};

/// Configuration for the sync coordinator.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Complete a pass over a clean snapshot without calling the adapter.
    pub skip_empty: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { skip_empty: true }
    }
}

/// A started pass, handed back to [`SyncCoordinator::finish`].
#[derive(Debug)]
pub struct PendingSync {
    changes: ChangeSet,
}

impl PendingSync {
    pub fn id(&self) -> SyncId {
        self.changes.sync_id
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }
}

/// Summary of a completed pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub sync_id: SyncId,
    /// Number of changes sent.
    pub pushed: usize,
    /// True if the adapter was not called because nothing was dirty.
    pub skipped: bool,
}

/// Gatekeeper for sync passes.
#[derive(Debug, Default)]
pub struct SyncCoordinator {
    config: SyncConfig,
    in_flight: Option<SyncId>,
}

impl SyncCoordinator {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            in_flight: None,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// The outstanding pass, if any.
    pub fn in_flight(&self) -> Option<SyncId> {
        self.in_flight
    }

    /// Starts a pass by collecting the snapshot's changes.
    ///
    /// # Errors
    ///
    /// [`SyncError::InFlight`] if a previous pass has not finished.
    pub fn begin(&mut self, snapshot: &Snapshot) -> SyncResult<PendingSync> {
        if let Some(id) = self.in_flight {
            return Err(SyncError::InFlight(id));
        }
        let changes = collect_changes(snapshot);
        info!("Starting sync {} with {} changes", changes.sync_id, changes.len());
        self.in_flight = Some(changes.sync_id);
        Ok(PendingSync { changes })
    }

    /// Ends a pass and releases the gate.
    ///
    /// On success the returned snapshot is `current` with statuses
    /// reconciled. On failure the error is returned and `current` is left
    /// exactly as it was.
    pub fn finish(
        &mut self,
        current: &Snapshot,
        pending: PendingSync,
        result: SyncResult<()>,
    ) -> SyncResult<Snapshot> {
        if self.in_flight != Some(pending.id()) {
            return Err(SyncError::UnknownSync(pending.id()));
        }
        self.in_flight = None;

        match result {
            Ok(()) => {
                info!("Sync {} acknowledged ({} changes)", pending.id(), pending.changes.len());
                Ok(acknowledge(current, &pending.changes))
            }
            Err(e) => {
                warn!("Sync {} failed: {}", pending.id(), e);
                Err(e)
            }
        }
    }

    /// Runs a full pass over `session`.
    pub async fn sync(
        &mut self,
        session: &mut EditorSession,
        adapter: &dyn SyncAdapter,
    ) -> SyncResult<SyncReport> {
        let pending = self.begin(session.snapshot())?;
        let sync_id = pending.id();
        let pushed = pending.changes.len();

        if pending.changes.is_empty() && self.config.skip_empty {
            debug!("Sync {} skipped: nothing to send", sync_id);
            self.finish(session.snapshot(), pending, Ok(()))?;
            return Ok(SyncReport {
                sync_id,
                pushed: 0,
                skipped: true,
            });
        }

        let result = adapter.push(&pending.changes).await;
        let next = self.finish(session.snapshot(), pending, result)?;
        session.replace(next);
        Ok(SyncReport {
            sync_id,
            pushed,
            skipped: false,
        })
    }

    /// Replaces the session's snapshot with the remote tree, all `synced`.
    ///
    /// # Errors
    ///
    /// [`SyncError::InFlight`] while a pass is outstanding.
    pub async fn refresh(
        &mut self,
        session: &mut EditorSession,
        adapter: &dyn SyncAdapter,
    ) -> SyncResult<()> {
        if let Some(id) = self.in_flight {
            return Err(SyncError::InFlight(id));
        }
        let products = adapter.fetch().await?;
        info!("Fetched {} products from remote", products.len());
        let snapshot = remote::snapshot_from_remote(products)?;
        session.replace(snapshot);
        Ok(())
    }
}
