//! Error types for the overlay crate.

use navpatch_diff::ChangeVerb;

/// Errors that can occur while layering a patch onto a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OverlayError {
    /// The change's path does not fit the tree it is applied to.
    #[error("cannot {verb} {path}: {reason}")]
    MalformedChange {
        verb: ChangeVerb,
        path: String,
        reason: String,
    },
}

/// Convenience alias for overlay results.
pub type OverlayResult<T> = Result<T, OverlayError>;
