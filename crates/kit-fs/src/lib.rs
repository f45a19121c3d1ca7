//! Filesystem primitives for kitsync
//!
//! Leaf utilities with no knowledge of upstream kits or revisions:
//! content digests, recursive file enumeration, and the normalized
//! relative-path key used for all file-identity comparisons.

pub mod checksum;
pub mod error;
pub mod path;
pub mod walk;

pub use checksum::{FileDigest, digest_bytes, digest_file};
pub use error::{Error, Result};
pub use path::RelativePath;
pub use walk::walk_files;
