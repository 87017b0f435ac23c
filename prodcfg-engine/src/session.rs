//! # Editor Session
//!
//! Owns the current snapshot for one editing client. All edits go through
//! `&mut self`, so there is exactly one writer.

use crate::grid::{self, DetailFilter, GridLayout};
use crate::{EngineConfig, EngineResult, Mutation, MutationEngine, Outcome};
use prodcfg_store::{archive, Snapshot};
use prodcfg_types::SessionId;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct EditorSession {
    id: SessionId,
    engine: MutationEngine,
    snapshot: Snapshot,
}

impl EditorSession {
    /// Starts a session over `snapshot`.
    pub fn new(config: EngineConfig, snapshot: Snapshot) -> Self {
        Self {
            id: SessionId::new(),
            engine: MutationEngine::new(config),
            snapshot,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn engine(&self) -> &MutationEngine {
        &self.engine
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Applies one edit. On error the current snapshot is kept.
    pub fn apply(&mut self, mutation: Mutation) -> EngineResult<Outcome> {
        match mutation.apply(&self.engine, &self.snapshot) {
            Ok(applied) => {
                debug!(
                    "Applied {} in session {}: {:?}",
                    mutation.name(),
                    self.id,
                    applied.outcome
                );
                self.snapshot = applied.snapshot;
                Ok(applied.outcome)
            }
            Err(e) => {
                warn!("Rejected {} in session {}: {}", mutation.name(), self.id, e);
                Err(e)
            }
        }
    }

    /// Swaps in a snapshot produced elsewhere (sync acknowledgement, remote
    /// refresh).
    pub fn replace(&mut self, snapshot: Snapshot) {
        info!(
            "Replaced snapshot in session {} ({} products)",
            self.id,
            snapshot.products().len()
        );
        self.snapshot = snapshot;
    }

    /// Restores from an archive. The session is unchanged on error.
    pub fn restore_json(&mut self, json: &str) -> EngineResult<()> {
        let restored = archive::import_json(json)?;
        info!(
            "Restored session {} from archive version {} ({} products)",
            self.id,
            restored.version,
            restored.snapshot.products().len()
        );
        self.snapshot = restored.snapshot;
        Ok(())
    }

    pub fn restore_path(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let json = std::fs::read_to_string(path).map_err(prodcfg_store::StoreError::from)?;
        self.restore_json(&json)
    }

    /// Serializes the current snapshot with the configured archive version.
    pub fn export_json(&self) -> EngineResult<String> {
        Ok(archive::export_json(
            &self.snapshot,
            &self.engine.config().archive_version,
        )?)
    }

    pub fn export_path(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        Ok(archive::write_to_path(
            path,
            &self.snapshot,
            &self.engine.config().archive_version,
        )?)
    }

    /// Detail grid layout of the current snapshot.
    pub fn layout(&self, filter: DetailFilter) -> GridLayout {
        grid::detail_layout(&self.snapshot, filter)
    }

    pub fn base_layout(&self) -> GridLayout {
        grid::base_layout(&self.snapshot)
    }

    pub fn is_dirty(&self) -> bool {
        self.snapshot.is_dirty()
    }
}
