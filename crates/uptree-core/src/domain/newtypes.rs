//! Domain newtypes with validation
//!
//! This module provides the strongly-typed relative path used as the identity
//! of every object under the sync root. Validity is ensured at construction
//! time so the rest of the engine can compare paths as plain strings.

use std::fmt::{self, Display, Formatter};
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// A validated path relative to the sync root.
///
/// `RelPath` always uses forward-slash separators regardless of host OS and is:
/// - Non-empty, with no leading or trailing `/`
/// - Free of empty, `.` and `..` segments
/// - Free of backslashes (host separators are converted on construction)
///
/// Paths are ordered by plain byte-wise lexicographic comparison. Because a
/// parent path is a strict string prefix of its children and prefixes sort
/// before their extensions, sorting a set of `RelPath`s places every parent
/// directory before its contents. The planner relies on this.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelPath(String);

impl RelPath {
    /// Create a new `RelPath` from a forward-slash string.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the string is empty, absolute,
    /// contains backslashes, or has empty/`.`/`..` segments.
    pub fn new(path: impl Into<String>) -> Result<Self, DomainError> {
        let path = path.into();

        if path.is_empty() {
            return Err(DomainError::InvalidPath(
                "relative path cannot be empty".to_string(),
            ));
        }
        if path.contains('\\') {
            return Err(DomainError::InvalidPath(format!(
                "relative path must use '/' separators: {path}"
            )));
        }
        if path.starts_with('/') || path.ends_with('/') {
            return Err(DomainError::InvalidPath(format!(
                "relative path must not start or end with '/': {path}"
            )));
        }
        for segment in path.split('/') {
            if segment.is_empty() {
                return Err(DomainError::InvalidPath(format!(
                    "relative path contains an empty segment: {path}"
                )));
            }
            if segment == "." || segment == ".." {
                return Err(DomainError::InvalidPath(format!(
                    "relative path contains '{segment}' segment: {path}"
                )));
            }
        }

        Ok(Self(path))
    }

    /// Create a `RelPath` from a host filesystem path, converting the host
    /// separator to `/`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the path is absolute, contains
    /// non-normal components, or is not valid UTF-8.
    pub fn from_fs(path: &Path) -> Result<Self, DomainError> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(c) => {
                    let segment = c.to_str().ok_or_else(|| {
                        DomainError::InvalidPath(format!(
                            "path is not valid UTF-8: {}",
                            path.display()
                        ))
                    })?;
                    segments.push(segment);
                }
                _ => {
                    return Err(DomainError::InvalidPath(format!(
                        "path must be plain and relative: {}",
                        path.display()
                    )));
                }
            }
        }
        Self::new(segments.join("/"))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the parent path, or `None` for a top-level path
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('/').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Get the final path segment
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Iterate over all proper ancestors, nearest first.
    ///
    /// `foo/bar/baz` yields `foo/bar`, then `foo`.
    pub fn ancestors(&self) -> impl Iterator<Item = RelPath> + '_ {
        std::iter::successors(self.parent(), RelPath::parent)
    }

    /// Returns true if `other` is strictly below this path.
    ///
    /// The parent-child relation is a string-prefix relation ending at a `/`
    /// boundary: `foo` is an ancestor of `foo/bar` but not of `foobar`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &RelPath) -> bool {
        other.0.len() > self.0.len()
            && other.0.as_bytes()[self.0.len()] == b'/'
            && other.0.starts_with(&self.0)
    }

    /// Join a single path segment
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPath` if the segment is invalid
    pub fn join(&self, segment: &str) -> Result<Self, DomainError> {
        Self::new(format!("{}/{segment}", self.0))
    }

    /// Resolve this relative path against a local root directory,
    /// using the host separator.
    #[must_use]
    pub fn resolve_in(&self, root: &Path) -> PathBuf {
        let mut full = root.to_path_buf();
        for segment in self.0.split('/') {
            full.push(segment);
        }
        full
    }
}

impl Display for RelPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RelPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RelPath {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RelPath> for String {
    fn from(path: RelPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod construction_tests {
        use super::*;

        #[test]
        fn test_new_valid() {
            let path = RelPath::new("foo/bar/baz.txt").unwrap();
            assert_eq!(path.as_str(), "foo/bar/baz.txt");
        }

        #[test]
        fn test_new_single_segment() {
            let path = RelPath::new("foo").unwrap();
            assert_eq!(path.as_str(), "foo");
        }

        #[test]
        fn test_empty_fails() {
            assert!(RelPath::new("").is_err());
        }

        #[test]
        fn test_leading_slash_fails() {
            assert!(RelPath::new("/foo").is_err());
        }

        #[test]
        fn test_trailing_slash_fails() {
            assert!(RelPath::new("foo/").is_err());
        }

        #[test]
        fn test_backslash_fails() {
            assert!(RelPath::new("foo\\bar").is_err());
        }

        #[test]
        fn test_empty_segment_fails() {
            assert!(RelPath::new("foo//bar").is_err());
        }

        #[test]
        fn test_dot_segments_fail() {
            assert!(RelPath::new("./foo").is_err());
            assert!(RelPath::new("foo/../bar").is_err());
        }

        #[test]
        fn test_from_fs() {
            let path = RelPath::from_fs(Path::new("foo/bar")).unwrap();
            assert_eq!(path.as_str(), "foo/bar");
        }

        #[test]
        fn test_from_fs_absolute_fails() {
            assert!(RelPath::from_fs(Path::new("/foo/bar")).is_err());
        }
    }

    mod relation_tests {
        use super::*;

        #[test]
        fn test_parent() {
            let path = RelPath::new("foo/bar/baz").unwrap();
            assert_eq!(path.parent().unwrap().as_str(), "foo/bar");
            assert_eq!(RelPath::new("foo").unwrap().parent(), None);
        }

        #[test]
        fn test_file_name() {
            assert_eq!(RelPath::new("foo/bar.txt").unwrap().file_name(), "bar.txt");
            assert_eq!(RelPath::new("foo").unwrap().file_name(), "foo");
        }

        #[test]
        fn test_ancestors() {
            let path = RelPath::new("foo/bar/baz").unwrap();
            let ancestors: Vec<String> =
                path.ancestors().map(|p| p.as_str().to_string()).collect();
            assert_eq!(ancestors, vec!["foo/bar", "foo"]);
        }

        #[test]
        fn test_is_ancestor_of() {
            let foo = RelPath::new("foo").unwrap();
            let child = RelPath::new("foo/bar").unwrap();
            let sibling = RelPath::new("foobar").unwrap();

            assert!(foo.is_ancestor_of(&child));
            assert!(!foo.is_ancestor_of(&sibling));
            assert!(!foo.is_ancestor_of(&foo));
            assert!(!child.is_ancestor_of(&foo));
        }

        #[test]
        fn test_join() {
            let path = RelPath::new("foo").unwrap().join("bar").unwrap();
            assert_eq!(path.as_str(), "foo/bar");
            assert!(RelPath::new("foo").unwrap().join("..").is_err());
        }

        #[test]
        fn test_ordering_puts_parents_first() {
            let mut paths = vec![
                RelPath::new("foo/bar").unwrap(),
                RelPath::new("bar").unwrap(),
                RelPath::new("foo").unwrap(),
            ];
            paths.sort();
            let sorted: Vec<&str> = paths.iter().map(RelPath::as_str).collect();
            assert_eq!(sorted, vec!["bar", "foo", "foo/bar"]);
        }

        #[test]
        fn test_resolve_in() {
            let path = RelPath::new("foo/bar").unwrap();
            let full = path.resolve_in(Path::new("/src"));
            assert_eq!(full, PathBuf::from("/src").join("foo").join("bar"));
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_serde_roundtrip() {
            let path = RelPath::new("foo/bar").unwrap();
            let json = serde_json::to_string(&path).unwrap();
            assert_eq!(json, "\"foo/bar\"");
            let parsed: RelPath = serde_json::from_str(&json).unwrap();
            assert_eq!(path, parsed);
        }

        #[test]
        fn test_deserialize_invalid_fails() {
            let result: Result<RelPath, _> = serde_json::from_str("\"/abs\"");
            assert!(result.is_err());
        }
    }
}
