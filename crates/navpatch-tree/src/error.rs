use std::path::PathBuf;

use navpatch_diff::PatchConflict;

/// Why a file's content could not be produced.
///
/// Content failures are memoized alongside successes, so the error is `Clone`
/// and every later reader receives the same value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    /// The underlying source could not be read.
    #[error("content unavailable: {0}")]
    Unavailable(String),

    /// A patch in the file's resolver chain did not apply.
    #[error("patch conflict: {0}")]
    Conflict(#[from] PatchConflict),
}

/// Result alias for content resolution.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors from building a base tree. These are fatal to the caller.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The repository root could not be read.
    #[error("repository unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The repository root exists but is not a directory.
    #[error("repository root is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An entry below the root failed under the fail-fast policy.
    #[error("unreadable entry: {0}")]
    Walk(#[from] walkdir::Error),

    /// An entry name is not valid UTF-8 under the fail-fast policy.
    #[error("entry name is not valid UTF-8: {0}")]
    InvalidName(PathBuf),
}

/// Result alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
