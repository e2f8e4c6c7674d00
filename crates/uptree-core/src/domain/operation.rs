//! Remote operations produced by the planner
//!
//! An [`Operation`] is the only value ever executed against the remote
//! client. Operations carry no state beyond their arguments; `Delete` and
//! `MakeDir` are idempotent to log and replay, `Put` additionally requires
//! its local file to still exist at execution time.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use super::newtypes::RelPath;

/// Execution phase of an operation.
///
/// Within one planned batch all `Delete` operations execute before any
/// `MakeDir`, and all `MakeDir` operations before any `Put`. A directory
/// cannot be created while a stale same-named remote object still exists,
/// and a file cannot be uploaded into a directory that does not yet exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Delete,
    MakeDir,
    Put,
}

/// One remote mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Remove a remote file, or a remote directory and everything below it
    Delete(RelPath),
    /// Create a remote directory (and any missing remote parents)
    MakeDir(RelPath),
    /// Upload a local file to a remote path, read at execution time
    Put {
        remote_path: RelPath,
        local_path: PathBuf,
    },
}

impl Operation {
    /// The phase this operation executes in
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Operation::Delete(_) => Phase::Delete,
            Operation::MakeDir(_) => Phase::MakeDir,
            Operation::Put { .. } => Phase::Put,
        }
    }

    /// The remote path this operation targets
    #[must_use]
    pub fn path(&self) -> &RelPath {
        match self {
            Operation::Delete(path) | Operation::MakeDir(path) => path,
            Operation::Put { remote_path, .. } => remote_path,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Delete(path) => write!(f, "delete {path}"),
            Operation::MakeDir(path) => write!(f, "mkdirs {path}"),
            Operation::Put {
                remote_path,
                local_path,
            } => write!(f, "put {remote_path} <- {}", local_path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel(path: &str) -> RelPath {
        RelPath::new(path).unwrap()
    }

    #[test]
    fn test_phase() {
        assert_eq!(Operation::Delete(rel("a")).phase(), Phase::Delete);
        assert_eq!(Operation::MakeDir(rel("a")).phase(), Phase::MakeDir);
        let put = Operation::Put {
            remote_path: rel("a"),
            local_path: PathBuf::from("/src/a"),
        };
        assert_eq!(put.phase(), Phase::Put);
    }

    #[test]
    fn test_phase_order() {
        assert!(Phase::Delete < Phase::MakeDir);
        assert!(Phase::MakeDir < Phase::Put);
    }

    #[test]
    fn test_path_accessor() {
        let put = Operation::Put {
            remote_path: rel("foo/bar"),
            local_path: PathBuf::from("/src/foo/bar"),
        };
        assert_eq!(put.path().as_str(), "foo/bar");
    }

    #[test]
    fn test_display() {
        assert_eq!(Operation::Delete(rel("foo")).to_string(), "delete foo");
        assert_eq!(Operation::MakeDir(rel("foo")).to_string(), "mkdirs foo");
    }
}
