//! Sync engine
//!
//! One [`SyncEngine`] instance owns one sync pass pipeline for one source
//! root: load previous snapshot, build current snapshot, diff, plan,
//! execute, persist. Each instance exclusively owns its state store entry;
//! concurrent passes over the same root are not supported and must be
//! serialized by the caller.
//!
//! ## Resumability
//!
//! State is persisted only after every planned operation succeeded, and
//! never in dry-run mode. A failed or cancelled pass leaves the previous
//! snapshot authoritative, so the next run's diff naturally re-detects and
//! re-attempts the unexecuted remainder; no explicit retry loop is needed.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};

use uptree_core::config::SyncConfig;
use uptree_core::domain::Phase;
use uptree_core::ports::{PathMatcher, RemoteClient};

use crate::diff::diff;
use crate::executor::execute;
use crate::planner::plan;
use crate::snapshot::build_snapshot;
use crate::state::StateStore;
use crate::SyncError;

/// Summary of one completed sync pass
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Total operations issued (or counted, for dry-run); the primary
    /// observable result of a pass, 0 when nothing changed
    pub operations: u64,
    /// Operations in the delete phase
    pub deletes: u64,
    /// Operations in the mkdir phase
    pub mkdirs: u64,
    /// Operations in the put phase
    pub puts: u64,
    /// Whether this was a dry run
    pub dry_run: bool,
    /// Wall-clock duration of the pass in milliseconds
    pub duration_ms: u64,
}

/// One-way incremental mirror engine
pub struct SyncEngine {
    client: Arc<dyn RemoteClient>,
    matcher: Arc<dyn PathMatcher>,
    config: SyncConfig,
    state: StateStore,
}

impl SyncEngine {
    /// Creates an engine for one source root.
    ///
    /// The matcher is built by the caller from the configured patterns
    /// (`SyncConfig::build_matcher`) or supplied directly in tests.
    pub fn new(
        client: Arc<dyn RemoteClient>,
        matcher: Arc<dyn PathMatcher>,
        config: SyncConfig,
    ) -> Self {
        let state = StateStore::new(&config.state_dir, &config.source);
        Self {
            client,
            matcher,
            config,
            state,
        }
    }

    /// Run one full incremental pass over the source tree.
    ///
    /// Returns the operation summary on success. A traversal failure aborts
    /// before any remote call; a client failure aborts the remainder of the
    /// batch with state not advanced. Cancelling the returned future between
    /// operations likewise leaves the previous state untouched.
    #[instrument(
        skip(self),
        fields(client = self.client.name(), source = %self.config.source.display())
    )]
    pub async fn incremental_copy(&self) -> Result<SyncSummary, SyncError> {
        let start = Instant::now();

        info!(
            client = self.client.name(),
            base_path = self.client.base_path(),
            dry_run = self.config.dry_run,
            full_sync = self.config.full_sync,
            "starting sync pass"
        );

        let previous = self.state.load().await;
        let current = build_snapshot(
            &self.config.source,
            self.matcher.as_ref(),
            self.config.fingerprint,
        )
        .await?;

        let changes = diff(&previous, &current, self.config.full_sync);
        let operations = plan(
            &changes,
            &previous,
            &self.config.source,
            self.config.delete_dest,
        );

        let phase_count =
            |phase: Phase| operations.iter().filter(|op| op.phase() == phase).count() as u64;
        let (deletes, mkdirs, puts) = (
            phase_count(Phase::Delete),
            phase_count(Phase::MakeDir),
            phase_count(Phase::Put),
        );

        info!(
            entries = current.len(),
            changes = changes.len(),
            deletes,
            mkdirs,
            puts,
            "pass planned"
        );

        let operations_issued =
            execute(self.client.as_ref(), &operations, self.config.dry_run).await?;

        if self.config.dry_run {
            info!(operations = operations_issued, "dry run, state not advanced");
        } else {
            self.state.save(&current).await?;
        }

        let summary = SyncSummary {
            operations: operations_issued,
            deletes,
            mkdirs,
            puts,
            dry_run: self.config.dry_run,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            operations = summary.operations,
            duration_ms = summary.duration_ms,
            "sync pass completed"
        );
        Ok(summary)
    }
}
