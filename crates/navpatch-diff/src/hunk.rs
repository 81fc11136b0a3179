//! Structured patch model: patch sets, file changes and hunks.
//!
//! These are the records a unified-diff parser produces. Line positions follow
//! unified-diff conventions: `old_start`/`new_start` are one-based, and a hunk
//! with a zero count anchors *after* the line named by its start.

use serde::{Deserialize, Serialize};

use crate::line_diff::LineDiff;

/// What a file change does to its path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeVerb {
    Add,
    Edit,
    Delete,
}

impl std::fmt::Display for ChangeVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeVerb::Add => write!(f, "add"),
            ChangeVerb::Edit => write!(f, "edit"),
            ChangeVerb::Delete => write!(f, "delete"),
        }
    }
}

/// A single line in a hunk body, without its trailing newline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "text", rename_all = "lowercase")]
pub enum HunkLine {
    /// Present in both old and new text.
    Context(String),
    /// Present only in the old text.
    Removed(String),
    /// Present only in the new text.
    Added(String),
}

impl HunkLine {
    pub fn text(&self) -> &str {
        match self {
            HunkLine::Context(s) | HunkLine::Removed(s) | HunkLine::Added(s) => s,
        }
    }
}

/// A contiguous block of a unified diff.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Line number in the old text where this hunk starts (1-based).
    pub old_start: usize,
    /// Number of old lines covered by this hunk.
    pub old_count: usize,
    /// Line number in the new text where this hunk starts (1-based).
    pub new_start: usize,
    /// Number of new lines produced by this hunk.
    pub new_count: usize,
    pub lines: Vec<HunkLine>,
    /// The new segment ends the file without a trailing newline
    /// (`\ No newline at end of file` after its last line).
    #[serde(default)]
    pub no_newline_at_end: bool,
}

impl Hunk {
    /// Build a hunk from its body, deriving the counts from the lines.
    pub fn new(old_start: usize, new_start: usize, lines: Vec<HunkLine>) -> Self {
        let old_count = lines
            .iter()
            .filter(|l| !matches!(l, HunkLine::Added(_)))
            .count();
        let new_count = lines
            .iter()
            .filter(|l| !matches!(l, HunkLine::Removed(_)))
            .count();
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            lines,
            no_newline_at_end: false,
        }
    }

    /// Mark the new segment's last line as unterminated.
    pub fn without_final_newline(mut self) -> Self {
        self.no_newline_at_end = true;
        self
    }

    /// The old segment: context and removed lines, in order.
    pub fn old_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            HunkLine::Context(s) | HunkLine::Removed(s) => Some(s.as_str()),
            HunkLine::Added(_) => None,
        })
    }

    /// The new segment: context and added lines, in order.
    pub fn new_lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|l| match l {
            HunkLine::Context(s) | HunkLine::Added(s) => Some(s.as_str()),
            HunkLine::Removed(_) => None,
        })
    }

    /// Zero-based index in the unmodified old text where the old segment begins.
    pub fn anchor(&self) -> usize {
        if self.old_count == 0 {
            self.old_start
        } else {
            self.old_start.saturating_sub(1)
        }
    }

    /// Line diff between this hunk's old and new segments.
    pub fn line_diff(&self) -> LineDiff<'_> {
        let old: Vec<&str> = self.old_lines().collect();
        let new: Vec<&str> = self.new_lines().collect();
        LineDiff::new(old, new)
    }
}

/// One file's worth of changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub verb: ChangeVerb,
    /// Slash-separated path. Destination for add/edit, source for delete.
    pub path: String,
    /// Ordered by `old_start`, non-overlapping.
    pub hunks: Vec<Hunk>,
}

impl FileChange {
    pub fn new(verb: ChangeVerb, path: impl Into<String>, hunks: Vec<Hunk>) -> Self {
        Self {
            verb,
            path: path.into(),
            hunks,
        }
    }

    /// Lines added, counted per hunk with [`LineDiff`] and summed.
    pub fn additions(&self) -> usize {
        self.hunks.iter().map(|h| h.line_diff().additions()).sum()
    }

    /// Lines removed, counted per hunk with [`LineDiff`] and summed.
    pub fn deletions(&self) -> usize {
        self.hunks.iter().map(|h| h.line_diff().deletions()).sum()
    }
}

/// An ordered sequence of file changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSet {
    pub changes: Vec<FileChange>,
}

impl PatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: FileChange) {
        self.changes.push(change);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileChange> {
        self.changes.iter()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl FromIterator<FileChange> for PatchSet {
    fn from_iter<I: IntoIterator<Item = FileChange>>(iter: I) -> Self {
        Self {
            changes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PatchSet {
    type Item = &'a FileChange;
    type IntoIter = std::slice::Iter<'a, FileChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
