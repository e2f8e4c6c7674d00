//! uptree Sync - Incremental mirror engine
//!
//! Computes, from successive filesystem snapshots, the minimal ordered set of
//! remote operations that converges a remote tree to match a local tree, and
//! issues them through the [`RemoteClient`](uptree_core::ports::RemoteClient)
//! port.
//!
//! ## Modules
//!
//! - [`snapshot`] - Builds the current snapshot by walking the source tree
//! - [`state`] - Persists the previous snapshot between runs
//! - [`diff`] - Compares previous and current snapshots into change records
//! - [`planner`] - Collapses, de-duplicates and orders remote operations
//! - [`executor`] - Issues planned operations against the remote client
//! - [`engine`] - One-pass orchestration of all of the above

pub mod diff;
pub mod engine;
pub mod executor;
pub mod planner;
pub mod snapshot;
pub mod state;

use std::path::PathBuf;

use thiserror::Error;

pub use engine::{SyncEngine, SyncSummary};

/// Errors that can occur during a sync pass
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local filesystem walk failure; fatal, the run aborts with no state
    /// mutation
    #[error("failed to walk source tree at {path}: {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote call failure; aborts the remainder of the batch, state is not
    /// advanced, already-applied operations stand
    #[error("remote {op} failed for '{path}': {source}")]
    Client {
        op: &'static str,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Persisted state could not be written
    #[error("failed to persist sync state to {path}: {source}")]
    State {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// A path under the source root failed validation
    #[error("invalid path under source root: {0}")]
    Path(#[from] uptree_core::domain::DomainError),
}
