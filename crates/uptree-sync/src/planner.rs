//! Operation planner
//!
//! Converts change records into the ordered, de-duplicated sequence of
//! remote operations. Two rules carry the correctness of the whole engine:
//!
//! 1. **Hierarchy collapsing** - when a directory is removed, none of its
//!    descendants emit their own delete; a single recursive `Delete` of the
//!    directory covers the subtree. Symmetrically, an added directory that
//!    already exists remotely as a directory is not re-created, and only one
//!    `MakeDir` is emitted per path however many times it is required.
//! 2. **Phase ordering** - all deletes, then all mkdirs, then all puts, each
//!    phase in ascending lexicographic path order. A parent path is a string
//!    prefix of its children and prefixes sort first, so the plain string
//!    sort alone guarantees parents are created before their contents; no
//!    depth computation is needed, and none must be introduced.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use uptree_core::domain::{
    ChangeKind, ChangeRecord, EntryKind, Operation, RelPath, Snapshot,
};

/// Plan the remote operations for a change set.
///
/// `previous` is consulted to avoid re-creating directories that already
/// exist remotely; `source_root` resolves put targets to local files;
/// `delete_dest` gates whether removed paths produce deletes at all (when
/// false, orphaned remote objects are left untouched).
pub fn plan(
    changes: &[ChangeRecord],
    previous: &Snapshot,
    source_root: &Path,
    delete_dest: bool,
) -> Vec<Operation> {
    let mut removed: BTreeSet<&RelPath> = BTreeSet::new();
    let mut removed_dirs: BTreeSet<&RelPath> = BTreeSet::new();
    let mut mkdirs: BTreeSet<RelPath> = BTreeSet::new();
    let mut puts: BTreeSet<RelPath> = BTreeSet::new();

    for change in changes {
        match (change.change, change.kind) {
            (ChangeKind::Removed, kind) => {
                if delete_dest {
                    removed.insert(&change.path);
                    if kind == EntryKind::Directory {
                        removed_dirs.insert(&change.path);
                    }
                }
            }
            (ChangeKind::Added, EntryKind::Directory) => {
                if !remote_dir_exists(previous, &change.path) {
                    mkdirs.insert(change.path.clone());
                }
            }
            (ChangeKind::Added, EntryKind::File) | (ChangeKind::Modified, EntryKind::File) => {
                puts.insert(change.path.clone());
            }
            // Directories have no content to update.
            (ChangeKind::Modified, EntryKind::Directory) => {}
        }
    }

    // Every put target needs its remote parents; walk up until a directory
    // that already exists remotely.
    for path in &puts {
        for ancestor in path.ancestors() {
            if remote_dir_exists(previous, &ancestor) {
                break;
            }
            mkdirs.insert(ancestor);
        }
    }

    // Hierarchy collapsing: drop removed paths covered by a removed ancestor
    // directory.
    let deletes = removed
        .iter()
        .filter(|path| !path.ancestors().any(|a| removed_dirs.contains(&a)));

    let mut operations = Vec::new();
    operations.extend(deletes.map(|path| Operation::Delete((*path).clone())));
    operations.extend(mkdirs.into_iter().map(Operation::MakeDir));
    operations.extend(puts.into_iter().map(|path| {
        let local_path = path.resolve_in(source_root);
        Operation::Put {
            remote_path: path,
            local_path,
        }
    }));

    debug!(operations = operations.len(), "plan assembled");
    operations
}

fn remote_dir_exists(previous: &Snapshot, path: &RelPath) -> bool {
    previous.get(path).is_some_and(|entry| entry.is_dir())
}
