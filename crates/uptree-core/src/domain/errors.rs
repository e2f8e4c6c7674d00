//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! currently path validation and pattern compilation failures.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid relative path format or content
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Invalid include/exclude pattern
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}
