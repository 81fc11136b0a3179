//! Lazily resolved file content.
//!
//! A file's content is a small computation graph. Each [`Content`] node holds
//! a [`Resolver`] saying how to produce its text, plus a once-cell that stores
//! the first result. A patched node points at the node it patches, so a chain
//! of edits on one file resolves bottom-up and every intermediate result is
//! cached in its own cell.

use std::fmt;
use std::sync::{Arc, OnceLock};

use navpatch_diff::{apply_hunks, Hunk};
use tracing::{debug, warn};

use crate::error::{ContentError, ContentResult};

/// Where unpatched text comes from.
///
/// Implementations may perform I/O; they are called at most once per
/// [`Content`] node that wraps them.
pub trait ContentSource: Send + Sync + fmt::Debug {
    fn load(&self) -> ContentResult<String>;
}

/// A source backed by an in-memory string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextSource(pub String);

impl ContentSource for TextSource {
    fn load(&self) -> ContentResult<String> {
        Ok(self.0.clone())
    }
}

/// How a [`Content`] node produces its text.
#[derive(Clone, Debug)]
pub enum Resolver {
    /// No text at all. The base of every added file.
    Empty,
    /// Text read straight from a source.
    Direct(Arc<dyn ContentSource>),
    /// The resolved text of `base` with `hunks` applied.
    Patched {
        base: Arc<Content>,
        hunks: Arc<[Hunk]>,
    },
}

/// A memoized node in a file's resolver chain.
pub struct Content {
    resolver: Resolver,
    memo: OnceLock<ContentResult<String>>,
}

impl Content {
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver,
            memo: OnceLock::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Resolver::Empty)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::from_source(Arc::new(TextSource(text.into())))
    }

    pub fn from_source(source: Arc<dyn ContentSource>) -> Self {
        Self::new(Resolver::Direct(source))
    }

    /// Wrap `base` so that resolving this node applies `hunks` to it.
    pub fn patched(base: Arc<Content>, hunks: Arc<[Hunk]>) -> Self {
        Self::new(Resolver::Patched { base, hunks })
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve the text, evaluating the resolver on first use only.
    ///
    /// Concurrent first callers block on the same cell; exactly one of them
    /// evaluates. Failures are cached like successes.
    pub fn resolve(&self) -> ContentResult<&str> {
        self.memo
            .get_or_init(|| self.evaluate())
            .as_deref()
            .map_err(|e| e.clone())
    }

    /// Returns `true` once a result (success or failure) has been stored.
    pub fn is_resolved(&self) -> bool {
        self.memo.get().is_some()
    }

    /// The unpatched root of this chain.
    pub fn baseline(&self) -> &Content {
        let mut current = self;
        while let Resolver::Patched { base, .. } = &current.resolver {
            current = base.as_ref();
        }
        current
    }

    /// Number of patches layered on top of the baseline.
    pub fn patch_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Resolver::Patched { base, .. } = &current.resolver {
            depth += 1;
            current = base.as_ref();
        }
        depth
    }

    fn evaluate(&self) -> ContentResult<String> {
        match &self.resolver {
            Resolver::Empty => Ok(String::new()),
            Resolver::Direct(source) => {
                debug!(?source, "loading content");
                source.load()
            }
            Resolver::Patched { base, hunks } => {
                let prev = base.resolve()?;
                apply_hunks(prev, hunks).map_err(|conflict| {
                    warn!(%conflict, "patch does not apply");
                    ContentError::from(conflict)
                })
            }
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content")
            .field("resolver", &self.resolver)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
