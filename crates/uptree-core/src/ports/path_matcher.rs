//! Path matcher port and the glob-based implementation
//!
//! The snapshot builder consults a [`PathMatcher`] for every visited object.
//! The trait keeps pattern semantics out of the engine; [`GlobMatcher`] is
//! the standard implementation over `glob::Pattern` lists, and [`MatchAll`]
//! covers the no-pattern case.

use glob::Pattern;

use crate::domain::errors::DomainError;

/// Pure include/exclude predicate over relative paths
pub trait PathMatcher: Send + Sync {
    /// Returns true if the file at `relative_path` should be synced
    fn matches(&self, relative_path: &str) -> bool;

    /// Returns true if the directory at `relative_path` should be traversed.
    ///
    /// A rejected directory is pruned entirely: its contents are never
    /// visited and never appear in a snapshot.
    fn matches_dir(&self, relative_path: &str) -> bool {
        self.matches(relative_path)
    }
}

/// Matcher that accepts every path
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl PathMatcher for MatchAll {
    fn matches(&self, _relative_path: &str) -> bool {
        true
    }
}

/// Glob-pattern matcher built from include and exclude lists.
///
/// A path matching any exclude pattern is rejected. When include patterns
/// are present, a file must additionally match at least one of them;
/// directories are rejected only by excludes, so an include list like
/// `["*.rs"]` does not prune the directories the selected files live in.
pub struct GlobMatcher {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl GlobMatcher {
    /// Compile a matcher from pattern strings.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPattern` if any pattern fails to compile
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self, DomainError> {
        Ok(Self {
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    fn excluded(&self, relative_path: &str) -> bool {
        self.excludes.iter().any(|p| p.matches(relative_path))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>, DomainError> {
    patterns
        .iter()
        .map(|raw| {
            Pattern::new(raw).map_err(|err| {
                DomainError::InvalidPattern(format!("{raw}: {err}"))
            })
        })
        .collect()
}

impl PathMatcher for GlobMatcher {
    fn matches(&self, relative_path: &str) -> bool {
        if self.excluded(relative_path) {
            return false;
        }
        if self.includes.is_empty() {
            return true;
        }
        self.includes.iter().any(|p| p.matches(relative_path))
    }

    fn matches_dir(&self, relative_path: &str) -> bool {
        !self.excluded(relative_path)
    }
}
