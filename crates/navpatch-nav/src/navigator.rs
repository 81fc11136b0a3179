//! Path navigation over an overlay tree.
//!
//! A request path is walked one segment at a time. Every folder on the way
//! contributes a listing level (children with their stats, the next segment
//! marked open); a file ends the walk with a body level. The navigator is
//! read-only after construction and can serve concurrent requests.

use std::fmt::Display;

use navpatch_diff::PatchSet;
use navpatch_overlay::path::join;
use navpatch_overlay::{build_overlay, ChangeIndex, DiffStats, Overlay, OverlayError};
use navpatch_tree::{ContentError, File, Folder, Repository, SkippedEntry, TreeNode};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::config::NavigatorConfig;
use crate::error::{NavError, NavResult};
use crate::render::Renderer;

/// One child in a folder listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub name: String,
    pub is_folder: bool,
    /// This child is the next segment of the request path.
    pub is_open: bool,
    pub stats: DiffStats,
}

/// What a level shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LevelView {
    Listing {
        entries: Vec<Entry>,
    },
    Body {
        text: String,
        /// The file is in the change index and `text` is annotated.
        changed: bool,
    },
    /// The file's content could not be produced. Only this level is affected.
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: ContentError,
    },
}

fn serialize_display<S: Serializer, T: Display>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// One step of a navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Level {
    /// Normalized path of the folder or file shown, `""` for the root.
    pub path: String,
    pub view: LevelView,
}

/// The levels produced for a request path.
///
/// On a bad path, `levels` still holds everything up to the failure so the
/// caller can render a breadcrumb trail.
#[derive(Debug)]
pub struct Navigation {
    pub levels: Vec<Level>,
    pub error: Option<NavError>,
}

impl Navigation {
    fn found(levels: Vec<Level>) -> Self {
        Self {
            levels,
            error: None,
        }
    }

    fn bad_path(levels: Vec<Level>, path: &str, segment: &str) -> Self {
        Self {
            levels,
            error: Some(NavError::BadPath {
                path: path.to_string(),
                segment: segment.to_string(),
            }),
        }
    }

    pub fn is_found(&self) -> bool {
        self.error.is_none()
    }

    pub fn last(&self) -> Option<&Level> {
        self.levels.last()
    }
}

/// A patched tree ready to be browsed.
#[derive(Debug)]
pub struct Navigator {
    root: Folder,
    index: ChangeIndex,
    rejected: Vec<OverlayError>,
    skipped: Vec<SkippedEntry>,
    renderer: Renderer,
}

impl Navigator {
    /// Fetch the base tree from `repository` and layer `patch` onto it.
    ///
    /// Repository failures are fatal; malformed changes are kept in
    /// [`rejected`](Self::rejected).
    pub fn new(
        repository: &dyn Repository,
        patch: &PatchSet,
        config: NavigatorConfig,
    ) -> NavResult<Self> {
        let base = repository.tree()?;
        let overlay = build_overlay(&base.root, patch);
        let mut nav = Self::from_overlay(overlay, config);
        nav.skipped = base.skipped;
        info!(
            changes = patch.len(),
            rejected = nav.rejected.len(),
            skipped = nav.skipped.len(),
            "navigator ready"
        );
        Ok(nav)
    }

    pub fn from_overlay(overlay: Overlay, config: NavigatorConfig) -> Self {
        Self {
            root: overlay.root,
            index: overlay.index,
            rejected: overlay.rejected,
            skipped: Vec::new(),
            renderer: Renderer::new(config.render),
        }
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    pub fn index(&self) -> &ChangeIndex {
        &self.index
    }

    pub fn rejected(&self) -> &[OverlayError] {
        &self.rejected
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Base-tree entries the repository left out.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Walk `path` and produce one level per segment.
    ///
    /// `"/"` and `""` produce a single root listing. A trailing slash is
    /// ignored. Naming a missing child, or going past a file, ends the walk
    /// with [`NavError::BadPath`].
    pub fn navigate_to(&self, path: &str) -> Navigation {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut levels = Vec::with_capacity(segments.len() + 1);
        let mut folder = &self.root;
        let mut node_path = String::new();

        for (i, segment) in segments.iter().enumerate() {
            levels.push(self.listing(folder, &node_path, Some(segment)));

            let Some(child) = folder.child(segment) else {
                debug!(path, segment, "no such entry");
                return Navigation::bad_path(levels, path, segment);
            };
            node_path = join(&node_path, segment);

            match child {
                TreeNode::Folder(next) => folder = next,
                TreeNode::File(file) => {
                    levels.push(self.body(file, &node_path));
                    return match segments.get(i + 1) {
                        Some(extra) => {
                            debug!(path, segment = extra, "path continues past a file");
                            Navigation::bad_path(levels, path, extra)
                        }
                        None => Navigation::found(levels),
                    };
                }
            }
        }

        levels.push(self.listing(folder, &node_path, None));
        Navigation::found(levels)
    }

    fn listing(&self, folder: &Folder, folder_path: &str, open: Option<&str>) -> Level {
        let entries = folder
            .children()
            .iter()
            .map(|child| Entry {
                name: child.name().to_string(),
                is_folder: child.is_folder(),
                is_open: open == Some(child.name()),
                stats: self.index.get_or_default(&join(folder_path, child.name())),
            })
            .collect();
        Level {
            path: folder_path.to_string(),
            view: LevelView::Listing { entries },
        }
    }

    fn body(&self, file: &File, file_path: &str) -> Level {
        let changed = self.index.is_changed_file(file_path);
        let view = match self.renderer.render_file(file, changed) {
            Ok(text) => LevelView::Body { text, changed },
            Err(error) => LevelView::Failed { error },
        };
        Level {
            path: file_path.to_string(),
            view,
        }
    }
}
