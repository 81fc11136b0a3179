//! Local-filesystem repository.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::content::{Content, ContentSource};
use crate::error::{ContentError, ContentResult, RepositoryError, RepositoryResult};
use crate::node::{File, Folder};
use crate::repository::{BaseTree, Repository, SkippedEntry, UnreadablePolicy};

/// Settings for [`FsRepository`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsRepositoryConfig {
    pub unreadable: UnreadablePolicy,
    pub follow_links: bool,
}

/// Reads a base tree from a directory on disk.
///
/// Directory structure is read eagerly; file contents are read on first access.
#[derive(Clone, Debug)]
pub struct FsRepository {
    root: PathBuf,
    config: FsRepositoryConfig,
}

impl FsRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(root, FsRepositoryConfig::default())
    }

    pub fn with_config(root: impl Into<PathBuf>, config: FsRepositoryConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn skip_or_fail(
        &self,
        path: &Path,
        reason: String,
        error: RepositoryError,
        skipped: &mut Vec<SkippedEntry>,
    ) -> RepositoryResult<()> {
        match self.config.unreadable {
            UnreadablePolicy::Fail => Err(error),
            UnreadablePolicy::Skip => {
                warn!(path = %path.display(), %reason, "skipping unreadable entry");
                skipped.push(SkippedEntry {
                    path: path.to_path_buf(),
                    reason,
                });
                Ok(())
            }
        }
    }
}

impl Repository for FsRepository {
    fn tree(&self) -> RepositoryResult<BaseTree> {
        let meta = std::fs::metadata(&self.root).map_err(|source| RepositoryError::Unavailable {
            path: self.root.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(RepositoryError::NotADirectory(self.root.clone()));
        }

        let name = self
            .root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(".");
        let mut root = Folder::new(name);
        let mut skipped = Vec::new();

        let mut walker = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(self.config.follow_links)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(err.into()),
                Err(err) => {
                    let path = err.path().unwrap_or(&self.root).to_path_buf();
                    let reason = err.to_string();
                    self.skip_or_fail(&path, reason, err.into(), &mut skipped)?;
                    continue;
                }
            };

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let segments: Option<Vec<&str>> = relative
                .components()
                .map(|c| c.as_os_str().to_str())
                .collect();
            let Some(segments) = segments else {
                self.skip_or_fail(
                    entry.path(),
                    "name is not valid UTF-8".into(),
                    RepositoryError::InvalidName(entry.path().to_path_buf()),
                    &mut skipped,
                )?;
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            };
            let Some((name, parents)) = segments.split_last() else {
                continue;
            };
            // The parent itself was skipped.
            let Some(parent) = root.descend_mut(parents) else {
                continue;
            };

            if entry.file_type().is_symlink() && entry.path().is_dir() {
                // Only reached with `follow_links` off; the link has no readable text.
                debug!(path = %entry.path().display(), "skipping directory symlink");
                skipped.push(SkippedEntry {
                    path: entry.path().to_path_buf(),
                    reason: "symbolic link to a directory".into(),
                });
            } else if entry.file_type().is_dir() {
                parent.insert(Folder::new(*name));
            } else {
                let source = Arc::new(FileSource::new(entry.path()));
                parent.insert(File::new(*name, Content::from_source(source)));
            }
        }

        debug!(root = %self.root.display(), skipped = skipped.len(), "base tree built");
        Ok(BaseTree { root, skipped })
    }
}

/// Reads a file from disk on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentSource for FileSource {
    fn load(&self) -> ContentResult<String> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            ContentError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
