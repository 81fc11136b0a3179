//! Folder/file tree nodes.
//!
//! Folders keep their children sorted by name and unique at each level, so
//! traversal order is deterministic without a separate sort step. Cloning a
//! tree is shallow for file content: clones share the same [`Content`] nodes
//! and therefore the same memoized results.

use std::fmt::Write as _;
use std::sync::Arc;

use navpatch_diff::Hunk;

use crate::content::Content;
use crate::error::ContentResult;

/// A node in a base or overlay tree.
#[derive(Clone, Debug)]
pub enum TreeNode {
    Folder(Folder),
    File(File),
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            TreeNode::Folder(folder) => folder.name(),
            TreeNode::File(file) => file.name(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, TreeNode::Folder(_))
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            TreeNode::Folder(folder) => Some(folder),
            TreeNode::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            TreeNode::File(file) => Some(file),
            TreeNode::Folder(_) => None,
        }
    }

    /// Render the subtree as one `-- `-indented line per node.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        write_node(self, 0, &mut out);
        out
    }
}

fn write_node(node: &TreeNode, level: usize, out: &mut String) {
    match node {
        TreeNode::Folder(folder) => write_outline(folder.name(), folder.children(), level, out),
        TreeNode::File(file) => write_outline(file.name(), &[], level, out),
    }
}

fn write_outline(name: &str, children: &[TreeNode], level: usize, out: &mut String) {
    let _ = writeln!(out, "{}{}", "-- ".repeat(level), name);
    for child in children {
        write_node(child, level + 1, out);
    }
}

impl From<Folder> for TreeNode {
    fn from(folder: Folder) -> Self {
        TreeNode::Folder(folder)
    }
}

impl From<File> for TreeNode {
    fn from(file: File) -> Self {
        TreeNode::File(file)
    }
}

/// A named, name-ordered list of children.
#[derive(Clone, Debug, Default)]
pub struct Folder {
    name: String,
    children: Vec<TreeNode>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Children in ascending name order.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.children
            .binary_search_by(|child| child.name().cmp(name))
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.position(name).ok().map(|idx| &self.children[idx])
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut TreeNode> {
        match self.position(name) {
            Ok(idx) => Some(&mut self.children[idx]),
            Err(_) => None,
        }
    }

    /// Insert `node` at its sorted position, replacing any same-named child.
    ///
    /// Returns the replaced child, if there was one.
    pub fn insert(&mut self, node: impl Into<TreeNode>) -> Option<TreeNode> {
        let node = node.into();
        match self.position(node.name()) {
            Ok(idx) => Some(std::mem::replace(&mut self.children[idx], node)),
            Err(idx) => {
                self.children.insert(idx, node);
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<TreeNode> {
        self.position(name)
            .ok()
            .map(|idx| self.children.remove(idx))
    }

    /// The existing child folder called `name`.
    pub fn folder_mut(&mut self, name: &str) -> Option<&mut Folder> {
        match self.child_mut(name)? {
            TreeNode::Folder(folder) => Some(folder),
            TreeNode::File(_) => None,
        }
    }

    /// The child folder called `name`, created empty if missing.
    ///
    /// Returns `None` when a file already occupies that name.
    pub fn ensure_folder(&mut self, name: &str) -> Option<&mut Folder> {
        let idx = match self.position(name) {
            Ok(idx) => idx,
            Err(idx) => {
                self.children.insert(idx, TreeNode::Folder(Folder::new(name)));
                idx
            }
        };
        match &mut self.children[idx] {
            TreeNode::Folder(folder) => Some(folder),
            TreeNode::File(_) => None,
        }
    }

    /// Walk existing folders along `segments`. Missing folders yield `None`.
    pub fn descend_mut(&mut self, segments: &[&str]) -> Option<&mut Folder> {
        match segments.split_first() {
            None => Some(self),
            Some((first, rest)) => self.folder_mut(first)?.descend_mut(rest),
        }
    }

    /// Walk folders along `segments`, creating any that are missing.
    pub fn ensure_path(&mut self, segments: &[&str]) -> Option<&mut Folder> {
        match segments.split_first() {
            None => Some(self),
            Some((first, rest)) => self.ensure_folder(first)?.ensure_path(rest),
        }
    }

    /// Look up a descendant by slash-separated path. Empty segments are ignored.
    pub fn lookup(&self, path: &str) -> Option<&TreeNode> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut node = self.child(first)?;
        for segment in segments {
            node = node.as_folder()?.child(segment)?;
        }
        Some(node)
    }

    /// Render this folder and everything below it, see [`TreeNode::outline`].
    pub fn outline(&self) -> String {
        let mut out = String::new();
        write_outline(&self.name, &self.children, 0, &mut out);
        out
    }
}

/// A named file with lazily resolved content.
#[derive(Clone, Debug)]
pub struct File {
    name: String,
    content: Arc<Content>,
}

impl File {
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self::shared(name, Arc::new(content))
    }

    /// A file over an existing content node.
    pub fn shared(name: impl Into<String>, content: Arc<Content>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file's text. Resolved on first call, cached afterwards.
    pub fn content(&self) -> ContentResult<&str> {
        self.content.resolve()
    }

    /// The text this file had before any patch in its chain.
    pub fn baseline(&self) -> ContentResult<&str> {
        self.content.baseline().resolve()
    }

    pub fn handle(&self) -> &Arc<Content> {
        &self.content
    }

    /// Layer `hunks` on top of the current resolver.
    ///
    /// Other clones of this file keep the resolver they had.
    pub fn patch(&mut self, hunks: Arc<[Hunk]>) {
        let base = Arc::clone(&self.content);
        self.content = Arc::new(Content::patched(base, hunks));
    }
}
