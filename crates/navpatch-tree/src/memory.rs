use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::content::Content;
use crate::error::RepositoryResult;
use crate::node::{File, Folder};
use crate::repository::{BaseTree, Repository, SkippedEntry};

/// In-memory repository built from path/text pairs.
///
/// Intended for tests and embedding. Paths are slash-separated; intermediate
/// folders are created as needed.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRepository {
    files: BTreeMap<String, String>,
    folders: Vec<String>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert_file(path, text);
        self
    }

    /// Add an empty folder (files imply their folders already).
    pub fn with_folder(mut self, path: impl Into<String>) -> Self {
        self.folders.push(path.into());
        self
    }

    pub fn insert_file(&mut self, path: impl Into<String>, text: impl Into<String>) {
        self.files.insert(path.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl Repository for InMemoryRepository {
    fn tree(&self) -> RepositoryResult<BaseTree> {
        let mut root = Folder::new(".");
        let mut skipped = Vec::new();

        for path in &self.folders {
            if root.ensure_path(&segments(path)).is_none() {
                skipped.push(SkippedEntry {
                    path: PathBuf::from(path),
                    reason: "a file occupies part of this path".into(),
                });
            }
        }

        for (path, text) in &self.files {
            let segs = segments(path);
            let Some((name, parents)) = segs.split_last() else {
                skipped.push(SkippedEntry {
                    path: PathBuf::from(path),
                    reason: "empty path".into(),
                });
                continue;
            };
            let Some(parent) = root.ensure_path(parents) else {
                skipped.push(SkippedEntry {
                    path: PathBuf::from(path),
                    reason: "a file occupies part of this path".into(),
                });
                continue;
            };
            if parent.child(name).is_some_and(|c| c.is_folder()) {
                skipped.push(SkippedEntry {
                    path: PathBuf::from(path),
                    reason: "a folder already has this name".into(),
                });
                continue;
            }
            parent.insert(File::new(*name, Content::text(text.as_str())));
        }

        Ok(BaseTree { root, skipped })
    }
}
