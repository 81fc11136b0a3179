//! Browsing a patched tree by path.
//!
//! [`Navigator`] combines a repository's base tree with a patch set and
//! answers path requests with one [`Level`] per segment: folder listings
//! carrying per-entry change stats, and finally a file body that is either
//! padded (unchanged) or annotated against its pre-patch text.
//!
//! ```no_run
//! use navpatch_diff::parse_patch;
//! use navpatch_nav::{Navigator, NavigatorConfig};
//! use navpatch_tree::FsRepository;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let patch = parse_patch(&std::fs::read_to_string("change.diff")?)?;
//! let repo = FsRepository::new("./checkout");
//! let nav = Navigator::new(&repo, &patch, NavigatorConfig::default())?;
//! for level in nav.navigate_to("/src/lib.rs").levels {
//!     println!("{}", level.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod navigator;
pub mod render;

pub use config::{NavigatorConfig, RenderConfig};
pub use error::{NavError, NavResult};
pub use navigator::{Entry, Level, LevelView, Navigation, Navigator};
pub use render::Renderer;
