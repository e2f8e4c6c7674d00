//! Snapshot builder
//!
//! Walks the source tree depth-first and produces the ordered mapping from
//! relative path to [`Entry`] that the diff engine consumes. The matcher is
//! consulted for every visited object: excluded directories are pruned
//! entirely (their contents are never visited and never appear in the
//! snapshot), excluded files are simply omitted. Symlinks and other
//! non-regular objects are skipped.
//!
//! Any traversal failure (missing root, permission denied) aborts the whole
//! build; a partial snapshot would make the subsequent diff delete remote
//! objects that still exist locally.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

use uptree_core::domain::{DomainError, Entry, RelPath, Snapshot};
use uptree_core::ports::PathMatcher;

use crate::SyncError;

/// Build a snapshot of the tree rooted at `root`, subject to `matcher`.
///
/// When `fingerprint` is set, every included file is read and its SHA-256
/// recorded in the entry, trading a full content read per file for reliable
/// change detection on filesystems with coarse mtime resolution.
///
/// # Errors
/// Returns [`SyncError::Traversal`] if the root does not exist or any
/// traversal step is denied by the OS.
#[instrument(skip(matcher), fields(root = %root.display()))]
pub async fn build_snapshot(
    root: &Path,
    matcher: &dyn PathMatcher,
    fingerprint: bool,
) -> Result<Snapshot, SyncError> {
    let mut snapshot = Snapshot::empty();
    walk(root, root, matcher, fingerprint, &mut snapshot).await?;
    debug!(entries = snapshot.len(), "snapshot built");
    Ok(snapshot)
}

/// Recursively walk `dir`, appending entries to `snapshot`.
///
/// Async recursion requires the boxed-future indirection.
fn walk<'a>(
    dir: &'a Path,
    root: &'a Path,
    matcher: &'a dyn PathMatcher,
    fingerprint: bool,
    snapshot: &'a mut Snapshot,
) -> Pin<Box<dyn Future<Output = Result<(), SyncError>> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|source| SyncError::Traversal {
                path: dir.to_path_buf(),
                source,
            })?;

        loop {
            let dirent = entries
                .next_entry()
                .await
                .map_err(|source| SyncError::Traversal {
                    path: dir.to_path_buf(),
                    source,
                })?;
            let Some(dirent) = dirent else {
                break;
            };

            let full_path = dirent.path();
            let rel = full_path
                .strip_prefix(root)
                .map_err(|_| {
                    DomainError::InvalidPath(format!(
                        "{} is not under {}",
                        full_path.display(),
                        root.display()
                    ))
                })
                .and_then(RelPath::from_fs)?;

            let file_type =
                dirent
                    .file_type()
                    .await
                    .map_err(|source| SyncError::Traversal {
                        path: full_path.clone(),
                        source,
                    })?;

            if file_type.is_dir() {
                if !matcher.matches_dir(rel.as_str()) {
                    debug!(path = %rel, "pruning excluded directory");
                    continue;
                }
                let metadata = metadata_of(&dirent, &full_path).await?;
                snapshot.insert(Entry::directory(rel, mtime_of(&metadata, &full_path)?));
                walk(&full_path, root, matcher, fingerprint, snapshot).await?;
            } else if file_type.is_file() {
                if !matcher.matches(rel.as_str()) {
                    continue;
                }
                let metadata = metadata_of(&dirent, &full_path).await?;
                let mut entry =
                    Entry::file(rel, metadata.len(), mtime_of(&metadata, &full_path)?);
                if fingerprint {
                    entry = entry.with_fingerprint(hash_file(&full_path).await?);
                }
                snapshot.insert(entry);
            } else {
                debug!(path = %rel, "skipping non-regular object");
            }
        }

        Ok(())
    })
}

async fn metadata_of(
    dirent: &tokio::fs::DirEntry,
    path: &Path,
) -> Result<std::fs::Metadata, SyncError> {
    dirent
        .metadata()
        .await
        .map_err(|source| SyncError::Traversal {
            path: path.to_path_buf(),
            source,
        })
}

fn mtime_of(metadata: &std::fs::Metadata, path: &Path) -> Result<DateTime<Utc>, SyncError> {
    metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .map_err(|source| SyncError::Traversal {
            path: path.to_path_buf(),
            source,
        })
}

/// SHA-256 of file content, lowercase hex
async fn hash_file(path: &Path) -> Result<String, SyncError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| SyncError::Traversal {
            path: path.to_path_buf(),
            source,
        })?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(format!("{:x}", hasher.finalize()))
}
