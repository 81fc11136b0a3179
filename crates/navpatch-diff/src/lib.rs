//! Patch model and line-level diff engine for navpatch.
//!
//! Everything here works on plain text split into lines. Nothing touches the
//! filesystem: callers hand in base text and get patched text back.
//!
//! # Key Types
//!
//! - [`PatchSet`] / [`FileChange`] / [`Hunk`] -- the structured form of a patch
//! - [`LineDiff`] / [`TaggedLine`] -- LCS alignment of two line sequences
//! - [`apply_hunks`] -- hunk application with offset drift and conflict detection
//! - [`parse_patch`] -- unified-diff text to [`PatchSet`]

pub mod apply;
pub mod error;
pub mod hunk;
pub mod line_diff;
pub mod parse;

pub use apply::apply_hunks;
pub use error::{ParseError, ParseResult, PatchConflict};
pub use hunk::{ChangeVerb, FileChange, Hunk, HunkLine, PatchSet};
pub use line_diff::{split_lines, LineDiff, LineTag, TaggedLine};
pub use parse::parse_patch;
