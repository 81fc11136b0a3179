//! Overlay trees for navpatch.
//!
//! Takes a base tree and a [`PatchSet`](navpatch_diff::PatchSet) and produces
//! an overlay: a copy of the tree whose files resolve to their patched text,
//! plus a [`ChangeIndex`] with line counts for every changed file and every
//! folder above one.
//!
//! # Key Types
//!
//! - [`OverlayBuilder`] / [`build_overlay`] -- apply changes in order
//! - [`Overlay`] -- the patched tree, its index and rejected changes
//! - [`ChangeIndex`] -- path to [`DiffStats`], folders aggregated bottom-up
//! - [`DiffStats`] -- additions, deletions and added/removed flags

pub mod builder;
pub mod error;
pub mod index;
pub mod path;
pub mod stats;

pub use builder::{build_overlay, Overlay, OverlayBuilder};
pub use error::{OverlayError, OverlayResult};
pub use index::ChangeIndex;
pub use stats::DiffStats;
