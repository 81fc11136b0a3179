use navpatch_tree::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    /// A request path names a child that does not exist, or continues past a file.
    #[error("bad path: {path} (no entry {segment:?})")]
    BadPath { path: String, segment: String },

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type NavResult<T> = Result<T, NavError>;
