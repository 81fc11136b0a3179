//! Base trees for navpatch.
//!
//! A tree is a [`Folder`]/[`File`] sum type. Folders keep children sorted by
//! name; files carry a [`Content`] node whose text is resolved on first read
//! and memoized for every later reader.
//!
//! # Repositories
//!
//! Base trees come from a [`Repository`]:
//!
//! - [`FsRepository`] -- a directory on disk, files read lazily
//! - [`InMemoryRepository`] -- path/text pairs, for tests and embedding
//!
//! # Design Rules
//!
//! 1. A tree is immutable once built, except for each content node's
//!    one-time memo write.
//! 2. Content resolution is safe to call concurrently; one caller evaluates,
//!    the rest see the stored result.
//! 3. Content failures are memoized too, never retried.
//! 4. Entries left out of a base tree are reported, never dropped silently.

pub mod content;
pub mod error;
pub mod fs;
pub mod memory;
pub mod node;
pub mod repository;

pub use content::{Content, ContentSource, Resolver, TextSource};
pub use error::{ContentError, ContentResult, RepositoryError, RepositoryResult};
pub use fs::{FileSource, FsRepository, FsRepositoryConfig};
pub use memory::InMemoryRepository;
pub use node::{File, Folder, TreeNode};
pub use repository::{BaseTree, Repository, SkippedEntry, UnreadablePolicy};
