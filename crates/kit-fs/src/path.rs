//! Normalized relative paths
//!
//! All file-identity comparisons in kitsync are keyed on paths relative to a
//! tree root, normalized to forward slashes regardless of host platform.
//! Conversion to the platform-native form happens only at I/O boundaries.

use std::path::{Path, PathBuf};

/// A path relative to a tree root, normalized to forward slashes.
///
/// Two `RelativePath`s are equal iff their normalized string forms are
/// equal. Ordering and hashing follow the normalized string, which makes
/// the type usable as a deterministic set/map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl RelativePath {
    /// Create a new RelativePath from any path-like input.
    ///
    /// Backslashes are converted to forward slashes and a leading `./`
    /// component is dropped.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        let normalized = normalized.strip_prefix("./").unwrap_or(&normalized);
        Self {
            inner: normalized.trim_start_matches('/').to_string(),
        }
    }

    /// Get the normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native path fragment.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Resolve this path beneath a tree root for I/O.
    pub fn under(&self, root: &Path) -> PathBuf {
        root.join(self.to_native())
    }
}

impl std::fmt::Display for RelativePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for RelativePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelativePath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
