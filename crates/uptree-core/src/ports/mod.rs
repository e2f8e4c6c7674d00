//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the trait boundaries the sync engine depends on but
//! whose implementations live elsewhere:
//!
//! - [`RemoteClient`] - The capability surface of the remote store
//!   (directory creation, file upload, delete), implemented in `uptree-remote`
//! - [`PathMatcher`] - The include/exclude predicate consulted during the
//!   snapshot walk

pub mod path_matcher;
pub mod remote_client;

pub use path_matcher::{GlobMatcher, MatchAll, PathMatcher};
pub use remote_client::RemoteClient;
