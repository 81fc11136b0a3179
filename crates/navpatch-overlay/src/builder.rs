//! Overlay construction: layer a patch set onto a copy of a base tree.
//!
//! The base tree is cloned, never mutated. Clones share file content nodes, so
//! anything already resolved in the base stays resolved in the overlay.

use std::sync::Arc;

use navpatch_diff::{ChangeVerb, FileChange, Hunk, PatchSet};
use navpatch_tree::{Content, File, Folder, TreeNode};
use tracing::{debug, info, warn};

use crate::error::{OverlayError, OverlayResult};
use crate::index::ChangeIndex;
use crate::path::normalize;
use crate::stats::DiffStats;

/// A patched tree together with its change statistics.
#[derive(Clone, Debug)]
pub struct Overlay {
    pub root: Folder,
    pub index: ChangeIndex,
    /// Changes that did not fit the tree and were left out.
    pub rejected: Vec<OverlayError>,
}

/// Applies file changes one at a time, then aggregates on [`finish`](Self::finish).
#[derive(Debug)]
pub struct OverlayBuilder {
    root: Folder,
    index: ChangeIndex,
    rejected: Vec<OverlayError>,
}

impl OverlayBuilder {
    pub fn new(base: &Folder) -> Self {
        Self {
            root: base.clone(),
            index: ChangeIndex::new(),
            rejected: Vec::new(),
        }
    }

    /// Apply every change in order. Malformed changes are collected, not fatal.
    pub fn apply_all(&mut self, patch: &PatchSet) -> &mut Self {
        for change in patch {
            if let Err(err) = self.apply(change) {
                warn!(%err, "rejected change");
                self.rejected.push(err);
            }
        }
        self
    }

    /// Apply one change to the tree and record its stats.
    ///
    /// On error the tree and index are left as they were.
    pub fn apply(&mut self, change: &FileChange) -> OverlayResult<()> {
        let malformed = |reason: &str| OverlayError::MalformedChange {
            verb: change.verb,
            path: change.path.clone(),
            reason: reason.to_string(),
        };

        let path = normalize(&change.path).ok_or_else(|| malformed("path names no file"))?;
        let segments: Vec<&str> = path.split('/').collect();
        let Some((name, parents)) = segments.split_last() else {
            return Err(malformed("path names no file"));
        };
        let hunks: Arc<[Hunk]> = Arc::from(change.hunks.clone());
        let mut stats = DiffStats::from_change(change, Arc::clone(&hunks));

        match change.verb {
            ChangeVerb::Add => {
                let parent = self
                    .root
                    .ensure_path(parents)
                    .ok_or_else(|| malformed("a file is in the way of its folder"))?;
                if parent.child(name).is_some_and(TreeNode::is_folder) {
                    return Err(malformed("a folder already has this name"));
                }
                let content = Content::patched(Arc::new(Content::empty()), hunks);
                parent.insert(File::new(*name, content));
                stats.added = true;
            }
            ChangeVerb::Edit | ChangeVerb::Delete => {
                let parent = self
                    .root
                    .descend_mut(parents)
                    .ok_or_else(|| malformed("parent folder does not exist"))?;
                match parent.child_mut(name) {
                    Some(TreeNode::File(file)) => file.patch(hunks),
                    Some(TreeNode::Folder(_)) => return Err(malformed("target is a folder")),
                    None => return Err(malformed("no such file")),
                }
                stats.removed = change.verb == ChangeVerb::Delete;
            }
        }

        debug!(
            verb = %change.verb,
            path = %path,
            additions = stats.additions,
            deletions = stats.deletions,
            "applied change"
        );
        self.index.record(&path, stats);
        Ok(())
    }

    /// Aggregate folder stats and hand back the overlay.
    pub fn finish(mut self) -> Overlay {
        self.index.aggregate();
        let (additions, deletions) = self.index.totals();
        info!(
            files = self.index.files().count(),
            additions,
            deletions,
            rejected = self.rejected.len(),
            "overlay built"
        );
        Overlay {
            root: self.root,
            index: self.index,
            rejected: self.rejected,
        }
    }
}

/// Build an overlay of `patch` on top of `base`.
pub fn build_overlay(base: &Folder, patch: &PatchSet) -> Overlay {
    let mut builder = OverlayBuilder::new(base);
    builder.apply_all(patch);
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use navpatch_diff::HunkLine;
    use navpatch_tree::{ContentError, InMemoryRepository, Repository};
    use proptest::prelude::*;

    fn ctx(s: &str) -> HunkLine {
        HunkLine::Context(s.into())
    }
    fn del(s: &str) -> HunkLine {
        HunkLine::Removed(s.into())
    }
    fn add(s: &str) -> HunkLine {
        HunkLine::Added(s.into())
    }

    fn base(files: &[(&str, &str)]) -> Folder {
        let mut repo = InMemoryRepository::new();
        for (path, text) in files {
            repo.insert_file(*path, *text);
        }
        repo.tree().unwrap().root
    }

    fn edit_two() -> FileChange {
        FileChange::new(
            ChangeVerb::Edit,
            "a.txt",
            vec![Hunk::new(1, 1, vec![ctx("1"), del("2"), add("two"), ctx("3")])],
        )
    }

    fn file<'a>(root: &'a Folder, path: &str) -> &'a File {
        root.lookup(path).unwrap().as_file().unwrap()
    }

    #[test]
    fn edit_scenario() {
        let base = base(&[("a.txt", "1\n2\n3\n")]);
        let overlay = build_overlay(&base, &[edit_two()].into_iter().collect());

        assert_eq!(file(&overlay.root, "a.txt").content().unwrap(), "1\ntwo\n3\n");
        let stats = overlay.index.get("a.txt").unwrap();
        assert_eq!((stats.additions, stats.deletions), (1, 1));
        assert!(overlay.rejected.is_empty());

        // The base tree is untouched.
        assert_eq!(file(&base, "a.txt").content().unwrap(), "1\n2\n3\n");
    }

    #[test]
    fn add_into_new_folder_scenario() {
        let base = base(&[("a.txt", "1\n")]);
        let patch: PatchSet = [FileChange::new(
            ChangeVerb::Add,
            "b/c.txt",
            vec![Hunk::new(0, 1, vec![add("hello")])],
        )]
        .into_iter()
        .collect();
        let overlay = build_overlay(&base, &patch);

        let b = overlay.root.lookup("b").unwrap();
        assert!(b.is_folder());
        assert_eq!(file(&overlay.root, "b/c.txt").content().unwrap(), "hello\n");

        let c = overlay.index.get("b/c.txt").unwrap();
        assert_eq!((c.additions, c.deletions, c.added), (1, 0, true));
        let b = overlay.index.get("b").unwrap();
        assert_eq!((b.additions, b.deletions, b.added), (1, 0, false));
        assert!(base.lookup("b").is_none());
    }

    #[test]
    fn conflict_scenario_keeps_siblings_readable() {
        let base = base(&[("a.txt", "1\nX\n3\n"), ("b.txt", "fine\n")]);
        let overlay = build_overlay(&base, &[edit_two()].into_iter().collect());

        assert!(matches!(
            file(&overlay.root, "a.txt").content(),
            Err(ContentError::Conflict(_))
        ));
        assert_eq!(file(&overlay.root, "b.txt").content().unwrap(), "fine\n");
        // Stats come from the hunks, not from applying them.
        assert_eq!(overlay.index.get("a.txt").unwrap().additions, 1);
    }

    #[test]
    fn crlf_files_keep_their_line_endings() {
        let base = base(&[("a.txt", "1\r\n2\r\n3\r\n"), ("b.txt", "1\r\n2\r\n3\r\n")]);
        let crlf = FileChange::new(
            ChangeVerb::Edit,
            "a.txt",
            vec![Hunk::new(1, 1, vec![ctx("1\r"), del("2\r"), add("two\r"), ctx("3\r")])],
        );
        let lf = FileChange {
            path: "b.txt".into(),
            ..edit_two()
        };
        let overlay = build_overlay(&base, &[crlf, lf].into_iter().collect());

        assert_eq!(file(&overlay.root, "a.txt").content().unwrap(), "1\r\ntwo\r\n3\r\n");
        assert!(matches!(
            file(&overlay.root, "b.txt").content(),
            Err(ContentError::Conflict(_))
        ));
    }

    #[test]
    fn successive_edits_chain() {
        let base = base(&[("a.txt", "1\n2\n3\n")]);
        let second = FileChange::new(
            ChangeVerb::Edit,
            "a.txt",
            vec![Hunk::new(3, 3, vec![ctx("3"), add("4")])],
        );
        let overlay = build_overlay(&base, &[edit_two(), second].into_iter().collect());

        let a = file(&overlay.root, "a.txt");
        assert_eq!(a.content().unwrap(), "1\ntwo\n3\n4\n");
        assert_eq!(a.baseline().unwrap(), "1\n2\n3\n");
        assert_eq!(a.handle().patch_depth(), 2);
        let stats = overlay.index.get("a.txt").unwrap();
        assert_eq!((stats.additions, stats.deletions), (2, 1));
    }

    #[test]
    fn delete_keeps_node_and_marks_removed() {
        let base = base(&[("dir/old.txt", "bye\nnow\n")]);
        let patch: PatchSet = [FileChange::new(
            ChangeVerb::Delete,
            "dir/old.txt",
            vec![Hunk::new(1, 0, vec![del("bye"), del("now")])],
        )]
        .into_iter()
        .collect();
        let overlay = build_overlay(&base, &patch);

        let old = file(&overlay.root, "dir/old.txt");
        assert_eq!(old.content().unwrap(), "");
        assert_eq!(old.baseline().unwrap(), "bye\nnow\n");
        let stats = overlay.index.get("dir/old.txt").unwrap();
        assert!(stats.removed);
        assert_eq!(stats.deletions, 2);
        assert!(!overlay.index.get("dir").unwrap().removed);
        assert_eq!(overlay.index.get("dir").unwrap().deletions, 2);
    }

    #[test]
    fn malformed_changes_are_rejected() {
        let base = base(&[("a.txt", "1\n"), ("dir/x", "x\n")]);
        let patch: PatchSet = [
            FileChange::new(ChangeVerb::Edit, "missing/a.txt", vec![]),
            FileChange::new(ChangeVerb::Edit, "nope.txt", vec![]),
            FileChange::new(ChangeVerb::Edit, "dir", vec![]),
            FileChange::new(ChangeVerb::Delete, "gone.txt", vec![]),
            FileChange::new(ChangeVerb::Add, "a.txt/inner", vec![]),
            FileChange::new(ChangeVerb::Add, "dir", vec![]),
            FileChange::new(ChangeVerb::Add, "", vec![]),
        ]
        .into_iter()
        .collect();
        let overlay = build_overlay(&base, &patch);

        assert_eq!(overlay.rejected.len(), 7);
        assert!(overlay.index.is_empty());
        assert!(overlay.root.lookup("missing").is_none());
        assert!(overlay.root.lookup("dir").unwrap().is_folder());
        assert!(matches!(
            &overlay.rejected[0],
            OverlayError::MalformedChange { verb: ChangeVerb::Edit, path, .. } if path == "missing/a.txt"
        ));
    }

    #[test]
    fn add_over_existing_file_replaces_it() {
        let base = base(&[("a.txt", "old\n")]);
        let patch: PatchSet = [FileChange::new(
            ChangeVerb::Add,
            "./a.txt",
            vec![Hunk::new(0, 1, vec![add("new")])],
        )]
        .into_iter()
        .collect();
        let overlay = build_overlay(&base, &patch);
        assert_eq!(file(&overlay.root, "a.txt").content().unwrap(), "new\n");
        assert!(overlay.index.get("a.txt").unwrap().added);
    }

    #[test]
    fn children_stay_sorted_after_insertions() {
        let base = base(&[("m.txt", ""), ("src/lib.rs", "")]);
        let patch: PatchSet = ["z.txt", "a.txt", "src/a.rs", "b/x"]
            .into_iter()
            .map(|p| FileChange::new(ChangeVerb::Add, p, vec![Hunk::new(0, 1, vec![add("x")])]))
            .collect();
        let overlay = build_overlay(&base, &patch);

        let names: Vec<&str> = overlay.root.children().iter().map(TreeNode::name).collect();
        assert_eq!(names, vec!["a.txt", "b", "m.txt", "src", "z.txt"]);
        let src = overlay.root.lookup("src").unwrap().as_folder().unwrap();
        let names: Vec<&str> = src.children().iter().map(TreeNode::name).collect();
        assert_eq!(names, vec!["a.rs", "lib.rs"]);
    }

    fn added_lines(n: usize) -> Vec<Hunk> {
        let lines = (0..n).map(|i| add(&format!("line {i}"))).collect();
        vec![Hunk::new(0, 1, lines)]
    }

    proptest! {
        #[test]
        fn folders_equal_sum_of_direct_children(
            paths in proptest::collection::btree_set("[abc](/[abc]){0,3}", 1..12),
            sizes in proptest::collection::vec(1usize..5, 12),
        ) {
            let patch: PatchSet = paths
                .iter()
                .zip(&sizes)
                .map(|(p, n)| FileChange::new(ChangeVerb::Add, p.as_str(), added_lines(*n)))
                .collect();
            let overlay = build_overlay(&Folder::new("."), &patch);

            for (path, stats) in overlay.index.iter() {
                if overlay.index.is_changed_file(path) {
                    continue;
                }
                let (mut additions, mut deletions) = (0, 0);
                for (child, child_stats) in overlay.index.iter() {
                    if crate::path::parent(child) == path && child != path {
                        additions += child_stats.additions;
                        deletions += child_stats.deletions;
                    }
                }
                prop_assert_eq!(stats.additions, additions);
                prop_assert_eq!(stats.deletions, deletions);
            }

            let applied: usize = overlay.index.files().count();
            prop_assert_eq!(applied + overlay.rejected.len(), paths.len());
        }
    }
}
