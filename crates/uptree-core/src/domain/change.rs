//! Change records produced by diffing two snapshots
//!
//! A [`ChangeRecord`] tags a path as added, modified, or removed together
//! with the object kind from the relevant snapshot (the current one for
//! additions and modifications, the previous one for removals). Change
//! records are transient: they feed the operation planner and are never
//! persisted.

use super::entry::EntryKind;
use super::newtypes::RelPath;

/// How a path changed between the previous and current snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One detected change at one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    /// Path relative to the sync root
    pub path: RelPath,
    /// Object kind, taken from the snapshot the change refers to
    pub kind: EntryKind,
    /// The direction of the change
    pub change: ChangeKind,
}

impl ChangeRecord {
    #[must_use]
    pub fn added(path: RelPath, kind: EntryKind) -> Self {
        Self {
            path,
            kind,
            change: ChangeKind::Added,
        }
    }

    #[must_use]
    pub fn modified(path: RelPath, kind: EntryKind) -> Self {
        Self {
            path,
            kind,
            change: ChangeKind::Modified,
        }
    }

    #[must_use]
    pub fn removed(path: RelPath, kind: EntryKind) -> Self {
        Self {
            path,
            kind,
            change: ChangeKind::Removed,
        }
    }
}
