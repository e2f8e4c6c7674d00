//! State store
//!
//! Persists the snapshot produced by the previous successful run so the next
//! run can diff against it. One JSON file per sync root lives under the
//! configured state directory, named by the SHA-256 of the canonicalised
//! source root path so distinct roots sharing a state directory never
//! collide.
//!
//! Writes go to a sibling temporary file followed by an atomic rename, so a
//! crash mid-run always leaves the previous state file under its old valid
//! value. An unreadable or unparseable state file is recovered locally by
//! treating the previous snapshot as empty (equivalent to a full sync) -
//! never a fatal error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use uptree_core::domain::Snapshot;

use crate::SyncError;

/// On-disk payload version; bumped on incompatible layout changes
const STATE_VERSION: u32 = 1;

/// Serialized form of one persisted snapshot
#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    version: u32,
    /// Source root the snapshot was built from, informational
    source: String,
    snapshot: Snapshot,
}

/// Persistence for the previous snapshot of one sync root
#[derive(Debug)]
pub struct StateStore {
    state_dir: PathBuf,
    file: PathBuf,
    source: String,
}

impl StateStore {
    /// Create a store scoped to `state_dir` and keyed by `source_root`.
    ///
    /// The root is canonicalised when possible so `./src` and its absolute
    /// form share one state file.
    #[must_use]
    pub fn new(state_dir: &Path, source_root: &Path) -> Self {
        let canonical = std::fs::canonicalize(source_root)
            .unwrap_or_else(|_| source_root.to_path_buf());
        let source = canonical.to_string_lossy().into_owned();

        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        let key = format!("{:x}", hasher.finalize());

        Self {
            state_dir: state_dir.to_path_buf(),
            file: state_dir.join(format!("{key}.json")),
            source,
        }
    }

    /// Path of the state file this store reads and writes
    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file
    }

    /// Load the previous snapshot.
    ///
    /// Missing state (first run) and corrupt state both yield an empty
    /// snapshot; corruption is logged and the next successful save repairs
    /// the file.
    pub async fn load(&self) -> Snapshot {
        let bytes = match tokio::fs::read(&self.file).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(file = %self.file.display(), "no previous state, starting empty");
                return Snapshot::empty();
            }
            Err(err) => {
                warn!(
                    file = %self.file.display(),
                    error = %err,
                    "previous state unreadable, treating as empty"
                );
                return Snapshot::empty();
            }
        };

        match serde_json::from_slice::<StateFile>(&bytes) {
            Ok(state) if state.version == STATE_VERSION => {
                debug!(
                    file = %self.file.display(),
                    entries = state.snapshot.len(),
                    "previous state loaded"
                );
                state.snapshot
            }
            Ok(state) => {
                warn!(
                    file = %self.file.display(),
                    version = state.version,
                    "unsupported state version, treating as empty"
                );
                Snapshot::empty()
            }
            Err(err) => {
                warn!(
                    file = %self.file.display(),
                    error = %err,
                    "previous state unparseable, treating as empty"
                );
                Snapshot::empty()
            }
        }
    }

    /// Persist `snapshot` as the new previous state.
    ///
    /// Writes to a temporary file in the state directory, then renames onto
    /// the state file; rename within one directory is atomic, so readers
    /// never observe a partial write.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), SyncError> {
        tokio::fs::create_dir_all(&self.state_dir)
            .await
            .map_err(|err| self.persist_error(err.into()))?;

        let state = StateFile {
            version: STATE_VERSION,
            source: self.source.clone(),
            snapshot: snapshot.clone(),
        };
        let payload = serde_json::to_vec_pretty(&state)
            .map_err(|err| self.persist_error(err.into()))?;

        let tmp_path = {
            let mut p = self.file.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        tokio::fs::write(&tmp_path, payload)
            .await
            .map_err(|err| self.persist_error(err.into()))?;
        tokio::fs::rename(&tmp_path, &self.file)
            .await
            .map_err(|err| self.persist_error(err.into()))?;

        debug!(
            file = %self.file.display(),
            entries = snapshot.len(),
            "state persisted"
        );
        Ok(())
    }

    fn persist_error(&self, source: anyhow::Error) -> SyncError {
        SyncError::State {
            path: self.file.clone(),
            source,
        }
    }
}
