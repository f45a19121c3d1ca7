//! Tracked-revision block parsing and writing.
//!
//! kitsync records the upstream revision a project was last synced to inside
//! the project's `kitsync.toml`, as a marked block under the `[upstream]`
//! section:
//!
//! ```text
//! [upstream]
//! # kitsync tracked revision - do not edit
//! revision = "aaa111"
//! ```
//!
//! This crate treats the surrounding file as opaque text: it locates the
//! block by its fixed marker comment, replaces it precisely, and preserves
//! every other byte. Reading is lenient (a missing or malformed block is
//! simply absent); writing is idempotent (writing the same revision twice
//! produces byte-identical output).

pub mod error;
pub mod parser;
pub mod writer;

pub use error::{Error, Result};
pub use parser::{REVISION_MARKER, SECTION_HEADER, find_revision, has_revision_block};
pub use writer::{append_section, upsert_revision};
