use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::RepositoryResult;
use crate::node::Folder;

/// A source of base trees.
///
/// All implementations must satisfy these invariants:
/// - The returned root is a folder whose children are recursively populated
///   and sorted by name.
/// - File content may be deferred until first read; reading is the only
///   side effect allowed after `tree()` returns.
/// - Entries that were left out are reported in [`BaseTree::skipped`], never
///   dropped silently.
pub trait Repository: Send + Sync {
    /// Build the base tree. Errors are fatal to the caller.
    fn tree(&self) -> RepositoryResult<BaseTree>;
}

/// A freshly built base tree plus the entries that could not be included.
#[derive(Clone, Debug, Default)]
pub struct BaseTree {
    pub root: Folder,
    pub skipped: Vec<SkippedEntry>,
}

/// An entry left out of a base tree under [`UnreadablePolicy::Skip`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// What to do with an entry that cannot be read while building a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Leave the entry out, record it, and keep going.
    #[default]
    Skip,
    /// Abort the whole build.
    Fail,
}
