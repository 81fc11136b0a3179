//! Error types for the diff crate.

/// A hunk whose old segment does not match the text it is applied to.
///
/// No partial result accompanies a conflict: a file either applies fully or
/// reports the first hunk that failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("hunk #{hunk_index} does not apply at line {line}: expected {expected:?}, found {actual:?}")]
pub struct PatchConflict {
    /// Zero-based position of the hunk within its file change.
    pub hunk_index: usize,
    /// One-based line in the current text where the hunk was expected.
    pub line: usize,
    /// The context and removed lines the hunk recorded.
    pub expected: Vec<String>,
    /// The lines actually present at that offset (possibly fewer).
    pub actual: Vec<String>,
}

/// Errors produced while parsing unified-diff text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {reason}")]
pub struct ParseError {
    /// One-based line number in the patch text.
    pub line: usize,
    pub reason: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

/// Convenience alias for parse results.
pub type ParseResult<T> = Result<T, ParseError>;
