//! SHA-256 content digests
//!
//! Provides a single canonical digest format (`sha256:<hex>`) used for all
//! file-content equality checks. Digests cover exact bytes only; filesystem
//! metadata (timestamps, permissions) never participates.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::error::{Error, Result};

/// Prefix for all digests produced by this module
const PREFIX: &str = "sha256:";

/// A content digest in the canonical `sha256:<hex>` form.
///
/// Digests are compared for equality only, never ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigest(String);

impl FileDigest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the digest of a byte slice.
pub fn digest_bytes(bytes: &[u8]) -> FileDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    FileDigest(format!("{}{:x}", PREFIX, hasher.finalize()))
}

/// Compute the digest of a file's contents.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn digest_file(path: &Path) -> Result<FileDigest> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(digest_bytes(&content))
}
