//! The change index: normalized path to [`DiffStats`].
//!
//! Changed files are recorded as the patch is applied. [`ChangeIndex::aggregate`]
//! then derives an entry for every ancestor folder. Folder entries are always
//! rebuilt from the recorded file entries alone, so a folder never feeds its
//! own total back into its ancestors and aggregating twice gives the same
//! result.

use std::collections::BTreeMap;

use crate::path::ancestors;
use crate::stats::DiffStats;

/// Path-keyed change statistics for one patch application.
#[derive(Clone, Debug, Default)]
pub struct ChangeIndex {
    /// Stats for changed files only, as recorded.
    files: BTreeMap<String, DiffStats>,
    /// Files plus aggregated ancestor folders.
    entries: BTreeMap<String, DiffStats>,
}

impl ChangeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record stats for a changed file.
    ///
    /// A path changed more than once accumulates its counts and hunks.
    pub fn record(&mut self, path: &str, stats: DiffStats) {
        match self.files.get_mut(path) {
            Some(existing) => existing.merge(stats),
            None => {
                self.files.insert(path.to_string(), stats);
            }
        }
    }

    /// Rebuild every entry: files as recorded, folders as the sum of the
    /// files below them.
    pub fn aggregate(&mut self) {
        let mut entries = self.files.clone();
        for (path, stats) in &self.files {
            for folder in ancestors(path) {
                entries
                    .entry(folder.to_string())
                    .or_default()
                    .accumulate(stats);
            }
        }
        self.entries = entries;
    }

    /// Stats for a file or folder path.
    pub fn get(&self, path: &str) -> Option<&DiffStats> {
        self.entries.get(path)
    }

    /// Stats for a path, zero if it is unchanged.
    pub fn get_or_default(&self, path: &str) -> DiffStats {
        self.get(path).cloned().unwrap_or_default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns `true` if `path` names a changed file (not just a folder above one).
    pub fn is_changed_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Changed file paths in ascending order.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// All entries in ascending path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiffStats)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total additions and deletions across all changed files.
    pub fn totals(&self) -> (usize, usize) {
        self.files
            .values()
            .fold((0, 0), |(a, d), s| (a + s.additions, d + s.deletions))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
