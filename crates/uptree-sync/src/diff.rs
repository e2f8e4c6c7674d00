//! Diff engine
//!
//! Compares the previous snapshot (as persisted by the last successful run)
//! with the freshly built current snapshot and produces the set of change
//! records the planner turns into remote operations.

use tracing::debug;

use uptree_core::domain::{ChangeRecord, Snapshot};

/// Compute the change set between two snapshots.
///
/// - A path present only in `current` is Added.
/// - A path present in both whose entries differ (`Entry::differs_from`) is
///   Modified.
/// - A path present only in `previous` is Removed.
/// - A path whose kind changed produces a Removed record (previous kind) and
///   an Added record (current kind): a remote hierarchical store cannot
///   transform a file into a directory in place.
///
/// When `full_sync` is set, the previous snapshot is treated as empty for
/// Added/Modified detection, so every currently-present path is re-synced;
/// the Removed set is still computed against the real previous snapshot so
/// stale remote entries are still cleaned up.
pub fn diff(previous: &Snapshot, current: &Snapshot, full_sync: bool) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();

    for (path, entry) in previous.iter() {
        match current.get(path) {
            None => changes.push(ChangeRecord::removed(path.clone(), entry.kind)),
            Some(now) if now.kind != entry.kind => {
                changes.push(ChangeRecord::removed(path.clone(), entry.kind));
            }
            Some(_) => {}
        }
    }

    for (path, entry) in current.iter() {
        let before = if full_sync { None } else { previous.get(path) };
        match before {
            None => changes.push(ChangeRecord::added(path.clone(), entry.kind)),
            Some(before) if before.kind != entry.kind => {
                changes.push(ChangeRecord::added(path.clone(), entry.kind));
            }
            Some(before) if before.differs_from(entry) => {
                changes.push(ChangeRecord::modified(path.clone(), entry.kind));
            }
            Some(_) => {}
        }
    }

    debug!(changes = changes.len(), full_sync, "diff computed");
    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use uptree_core::domain::{ChangeKind, Entry, EntryKind, RelPath};

    fn mtime(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn rel(path: &str) -> RelPath {
        RelPath::new(path).unwrap()
    }

    fn snapshot(entries: Vec<Entry>) -> Snapshot {
        let mut snapshot = Snapshot::empty();
        for entry in entries {
            snapshot.insert(entry);
        }
        snapshot
    }

    fn find(changes: &[ChangeRecord], path: &str) -> Vec<ChangeKind> {
        changes
            .iter()
            .filter(|c| c.path.as_str() == path)
            .map(|c| c.change)
            .collect()
    }

    #[test]
    fn test_both_empty() {
        assert!(diff(&Snapshot::empty(), &Snapshot::empty(), false).is_empty());
    }

    #[test]
    fn test_added() {
        let current = snapshot(vec![Entry::file(rel("a"), 1, mtime(100))]);
        let changes = diff(&Snapshot::empty(), &current, false);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change, ChangeKind::Added);
        assert_eq!(changes[0].kind, EntryKind::File);
    }

    #[test]
    fn test_removed() {
        let previous = snapshot(vec![Entry::directory(rel("d"), mtime(100))]);
        let changes = diff(&previous, &Snapshot::empty(), false);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change, ChangeKind::Removed);
        assert_eq!(changes[0].kind, EntryKind::Directory);
    }

    #[test]
    fn test_unchanged_produces_nothing() {
        let entry = Entry::file(rel("a"), 1, mtime(100));
        let previous = snapshot(vec![entry.clone()]);
        let current = snapshot(vec![entry]);
        assert!(diff(&previous, &current, false).is_empty());
    }

    #[test]
    fn test_modified_file() {
        let previous = snapshot(vec![Entry::file(rel("a"), 1, mtime(100))]);
        let current = snapshot(vec![Entry::file(rel("a"), 2, mtime(200))]);
        let changes = diff(&previous, &current, false);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change, ChangeKind::Modified);
    }

    #[test]
    fn test_directory_mtime_change_is_not_modified() {
        let previous = snapshot(vec![Entry::directory(rel("d"), mtime(100))]);
        let current = snapshot(vec![Entry::directory(rel("d"), mtime(999))]);
        assert!(diff(&previous, &current, false).is_empty());
    }

    #[test]
    fn test_kind_change_is_removed_then_added() {
        let previous = snapshot(vec![Entry::file(rel("x"), 1, mtime(100))]);
        let current = snapshot(vec![Entry::directory(rel("x"), mtime(100))]);
        let changes = diff(&previous, &current, false);

        assert_eq!(
            find(&changes, "x"),
            vec![ChangeKind::Removed, ChangeKind::Added]
        );
        let removed = changes.iter().find(|c| c.change == ChangeKind::Removed).unwrap();
        assert_eq!(removed.kind, EntryKind::File);
        let added = changes.iter().find(|c| c.change == ChangeKind::Added).unwrap();
        assert_eq!(added.kind, EntryKind::Directory);
    }

    #[test]
    fn test_full_sync_readds_unchanged_paths() {
        let entry = Entry::file(rel("a"), 1, mtime(100));
        let previous = snapshot(vec![entry.clone()]);
        let current = snapshot(vec![entry]);

        let changes = diff(&previous, &current, true);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].change, ChangeKind::Added);
    }

    #[test]
    fn test_full_sync_still_detects_removed() {
        let previous = snapshot(vec![
            Entry::file(rel("gone"), 1, mtime(100)),
            Entry::file(rel("kept"), 1, mtime(100)),
        ]);
        let current = snapshot(vec![Entry::file(rel("kept"), 1, mtime(100))]);

        let changes = diff(&previous, &current, true);
        assert_eq!(find(&changes, "gone"), vec![ChangeKind::Removed]);
        assert_eq!(find(&changes, "kept"), vec![ChangeKind::Added]);
    }

    #[test]
    fn test_fingerprint_tiebreak_suppresses_mtime_change() {
        let previous =
            snapshot(vec![Entry::file(rel("a"), 1, mtime(100)).with_fingerprint("abc".into())]);
        let current =
            snapshot(vec![Entry::file(rel("a"), 1, mtime(200)).with_fingerprint("abc".into())]);
        assert!(diff(&previous, &current, false).is_empty());
    }

    #[test]
    fn test_output_is_ordered() {
        let previous = snapshot(vec![Entry::file(rel("zap"), 1, mtime(100))]);
        let current = snapshot(vec![
            Entry::file(rel("bar"), 1, mtime(100)),
            Entry::file(rel("foo"), 1, mtime(100)),
        ]);
        let changes = diff(&previous, &current, false);
        let paths: Vec<&str> = changes.iter().map(|c| c.path.as_str()).collect();
        // Removed records first, then additions in ascending path order.
        assert_eq!(paths, vec!["zap", "bar", "foo"]);
    }
}
