//! Local-directory client (secondary/driven adapter)
//!
//! Implements [`RemoteClient`] against another local directory over
//! `tokio::fs`, which makes `uptree` usable as a plain directory mirror and
//! gives the engine's integration tests a real hierarchical store.
//!
//! ## Design Decisions
//!
//! - **No implicit parents on `put`**: `tokio::fs::copy` fails when the
//!   target directory is missing, exactly like a remote store without
//!   auto-created parents. Planner ordering bugs surface here instead of
//!   being masked.
//! - **Recursive `delete`**: directories are removed with their contents;
//!   deleting a missing path is an error, matching the port contract.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tracing::{debug, instrument};

use uptree_core::ports::RemoteClient;

/// Client that mirrors into a base directory on the local filesystem
#[derive(Debug, Clone)]
pub struct LocalDirClient {
    name: String,
    base_path: PathBuf,
    base_display: String,
}

impl LocalDirClient {
    /// Create a client mirroring into `base_path`
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::named("local", base_path)
    }

    /// Create a client with an explicit display name
    #[must_use]
    pub fn named(name: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        let base_display = base_path.to_string_lossy().into_owned();
        Self {
            name: name.into(),
            base_path,
            base_display,
        }
    }

    /// Resolve a relative forward-slash path against the base directory.
    ///
    /// The engine only ever passes validated relative paths; the checks here
    /// keep a misbehaving caller from escaping the base directory.
    fn resolve(&self, path: &str) -> anyhow::Result<PathBuf> {
        if path.is_empty() || path.starts_with('/') {
            bail!("remote path must be relative: '{path}'");
        }
        let mut resolved = self.base_path.clone();
        for segment in path.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                bail!("remote path contains invalid segment: '{path}'");
            }
            resolved.push(segment);
        }
        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl RemoteClient for LocalDirClient {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_path(&self) -> &str {
        &self.base_display
    }

    #[instrument(skip(self), fields(client = %self.name))]
    async fn mkdirs(&self, path: &str) -> anyhow::Result<()> {
        let target = self.resolve(path)?;
        debug!(target = %target.display(), "creating directory");
        tokio::fs::create_dir_all(&target)
            .await
            .with_context(|| format!("mkdirs failed for {}", target.display()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(client = %self.name))]
    async fn put(&self, remote_path: &str, local_path: &Path) -> anyhow::Result<()> {
        let target = self.resolve(remote_path)?;
        debug!(
            source = %local_path.display(),
            target = %target.display(),
            "copying file"
        );
        tokio::fs::copy(local_path, &target)
            .await
            .with_context(|| {
                format!(
                    "put failed for {} -> {}",
                    local_path.display(),
                    target.display()
                )
            })?;
        Ok(())
    }

    #[instrument(skip(self), fields(client = %self.name))]
    async fn delete(&self, path: &str) -> anyhow::Result<()> {
        let target = self.resolve(path)?;
        let metadata = tokio::fs::metadata(&target)
            .await
            .with_context(|| format!("delete target missing: {}", target.display()))?;

        debug!(target = %target.display(), "deleting");
        if metadata.is_dir() {
            tokio::fs::remove_dir_all(&target)
                .await
                .with_context(|| format!("delete failed for {}", target.display()))?;
        } else {
            tokio::fs::remove_file(&target)
                .await
                .with_context(|| format!("delete failed for {}", target.display()))?;
        }
        Ok(())
    }
}
