//! Per-path change statistics.

use std::sync::Arc;

use navpatch_diff::{FileChange, Hunk};
use serde::Serialize;

/// Line-change counts for a file or folder.
///
/// `added` and `removed` are set only on the changed file itself, never on
/// its ancestor folders. `hunks` are kept for rendering and play no part in
/// aggregation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub additions: usize,
    pub deletions: usize,
    pub added: bool,
    pub removed: bool,
    #[serde(skip)]
    pub hunks: Arc<[Hunk]>,
}

impl Default for DiffStats {
    fn default() -> Self {
        Self {
            additions: 0,
            deletions: 0,
            added: false,
            removed: false,
            hunks: Arc::from(Vec::new()),
        }
    }
}

impl DiffStats {
    /// Stats for one file change, counted per hunk with the line differ.
    pub fn from_change(change: &FileChange, hunks: Arc<[Hunk]>) -> Self {
        Self {
            additions: change.additions(),
            deletions: change.deletions(),
            added: false,
            removed: false,
            hunks,
        }
    }

    /// Returns `true` if no lines were added or removed.
    pub fn is_zero(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }

    /// Fold another change to the same file into this one.
    pub(crate) fn merge(&mut self, other: DiffStats) {
        self.additions += other.additions;
        self.deletions += other.deletions;
        self.added |= other.added;
        self.removed |= other.removed;
        let hunks: Vec<Hunk> = self.hunks.iter().chain(other.hunks.iter()).cloned().collect();
        self.hunks = Arc::from(hunks);
    }

    /// Add only the counts of `other`, as a folder does for its descendants.
    pub(crate) fn accumulate(&mut self, other: &DiffStats) {
        self.additions += other.additions;
        self.deletions += other.deletions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navpatch_diff::{ChangeVerb, HunkLine};

    #[test]
    fn from_change_counts_lines() {
        let change = FileChange::new(
            ChangeVerb::Edit,
            "a.txt",
            vec![Hunk::new(
                1,
                1,
                vec![
                    HunkLine::Context("1".into()),
                    HunkLine::Removed("2".into()),
                    HunkLine::Added("two".into()),
                    HunkLine::Context("3".into()),
                ],
            )],
        );
        let hunks: Arc<[Hunk]> = Arc::from(change.hunks.clone());
        let stats = DiffStats::from_change(&change, hunks);
        assert_eq!((stats.additions, stats.deletions), (1, 1));
        assert!(!stats.added && !stats.removed);
        assert_eq!(stats.hunks.len(), 1);
    }

    #[test]
    fn folder_accumulation_ignores_flags() {
        let mut folder = DiffStats::default();
        let file = DiffStats {
            additions: 3,
            deletions: 1,
            added: true,
            ..Default::default()
        };
        folder.accumulate(&file);
        folder.accumulate(&file);
        assert_eq!((folder.additions, folder.deletions), (6, 2));
        assert!(!folder.added);
        assert!(folder.hunks.is_empty());
    }

    #[test]
    fn serializes_without_hunks() {
        let stats = DiffStats {
            additions: 2,
            removed: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["additions"], 2);
        assert_eq!(json["removed"], true);
        assert!(json.get("hunks").is_none());
    }
}
