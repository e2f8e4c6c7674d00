//! Snapshot entries and the snapshot mapping
//!
//! An [`Entry`] describes one filesystem object under the sync root; a
//! [`Snapshot`] is the ordered mapping of every selected object at one
//! instant. Two snapshots exist during a sync pass: the *previous* one loaded
//! from the state store (immutable for the duration of the run) and the
//! *current* one freshly built from the tree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::newtypes::RelPath;

/// Kind of filesystem object an entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Directory => write!(f, "directory"),
        }
    }
}

/// One filesystem object under the sync root.
///
/// Modification is detected from `(kind, size, mtime)` without reading
/// content; the optional `fingerprint` (lowercase-hex SHA-256 of file
/// content) acts as a tie-breaker when it is available on both sides of a
/// comparison, so a touched-but-unchanged file is not re-uploaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Path relative to the sync root, unique within a snapshot
    pub path: RelPath,
    /// File or directory
    pub kind: EntryKind,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Last modification time
    pub mtime: DateTime<Utc>,
    /// Optional content hash (files only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Entry {
    /// Create a file entry
    #[must_use]
    pub fn file(path: RelPath, size: u64, mtime: DateTime<Utc>) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            size,
            mtime,
            fingerprint: None,
        }
    }

    /// Create a directory entry
    #[must_use]
    pub fn directory(path: RelPath, mtime: DateTime<Utc>) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            size: 0,
            mtime,
            fingerprint: None,
        }
    }

    /// Attach a content fingerprint
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: String) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Returns true if this entry is a directory
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Modification predicate between two entries at the same path.
    ///
    /// Directories never differ (they have no content to update). Files
    /// differ when size or mtime differ, except that when fingerprints are
    /// present on both sides they decide alone: equal fingerprints mean
    /// unchanged even if the mtime moved.
    #[must_use]
    pub fn differs_from(&self, other: &Entry) -> bool {
        if self.kind != other.kind {
            return true;
        }
        if self.is_dir() {
            return false;
        }
        if let (Some(a), Some(b)) = (&self.fingerprint, &other.fingerprint) {
            return a != b;
        }
        self.size != other.size || self.mtime != other.mtime
    }
}

/// Ordered mapping from relative path to [`Entry`].
///
/// Iteration order is ascending lexicographic path order (the map key order),
/// which places parent directories before their contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<RelPath, Entry>,
}

impl Snapshot {
    /// Create an empty snapshot
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Insert an entry, keyed by its path.
    ///
    /// A second insert at the same path replaces the first; the walk never
    /// produces duplicates.
    pub fn insert(&mut self, entry: Entry) {
        self.entries.insert(entry.path.clone(), entry);
    }

    /// Look up an entry by path
    #[must_use]
    pub fn get(&self, path: &RelPath) -> Option<&Entry> {
        self.entries.get(path)
    }

    /// Returns true if the snapshot contains the path
    #[must_use]
    pub fn contains(&self, path: &RelPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the snapshot has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(path, entry)` pairs in ascending path order
    pub fn iter(&self) -> impl Iterator<Item = (&RelPath, &Entry)> {
        self.entries.iter()
    }

    /// Iterate over paths in ascending order
    pub fn paths(&self) -> impl Iterator<Item = &RelPath> {
        self.entries.keys()
    }
}
