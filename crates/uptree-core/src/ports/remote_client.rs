//! Remote client port (driven/secondary port)
//!
//! This module defines the capability interface for the remote store the
//! engine mirrors into. Implementations own authentication, wire protocol and
//! retry policy; the engine only sees the three mutation primitives plus two
//! identity fields.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - Uses `#[async_trait]` for async trait methods; each call is a unit of
//!   suspension with a defined completion point, and the executor awaits one
//!   call before issuing the next.
//! - `name` and `base_path` exist for display and logging only; no engine
//!   decision ever depends on them.

use std::path::Path;

/// Port trait for remote store mutations
///
/// Paths are relative, forward-slash strings as produced by the planner;
/// resolution against the remote base path is the implementation's concern.
#[async_trait::async_trait]
pub trait RemoteClient: Send + Sync {
    /// Human-readable client name, for logging
    fn name(&self) -> &str;

    /// Remote base path the client resolves relative paths against, for logging
    fn base_path(&self) -> &str;

    /// Creates a remote directory, including any missing remote parents
    ///
    /// # Errors
    /// Fails on permission errors or when the name collides with an existing
    /// non-directory object
    async fn mkdirs(&self, path: &str) -> anyhow::Result<()>;

    /// Uploads a local file to a remote path
    ///
    /// The local file is read at call time; the caller must ensure it still
    /// exists when the operation executes.
    ///
    /// # Errors
    /// Fails on local I/O or transport errors
    async fn put(&self, remote_path: &str, local_path: &Path) -> anyhow::Result<()>;

    /// Deletes a remote file, or a remote directory recursively
    ///
    /// # Errors
    /// Fails if the path does not exist remotely
    async fn delete(&self, path: &str) -> anyhow::Result<()>;
}
