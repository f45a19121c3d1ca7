//! Revision tracker
//!
//! The single piece of persisted state: the upstream revision the local
//! tree was last confirmed to match, stored as a marked block inside
//! `kitsync.toml`. Reads are lenient (absence means "never synced");
//! writes are idempotent and preserve every unrelated byte of the file.

use std::path::{Path, PathBuf};

use kit_vcs::RevisionId;

use crate::config::ProjectConfig;
use crate::error::{Error, Result};

/// Reads and writes the tracked upstream revision.
#[derive(Debug, Clone)]
pub struct RevisionTracker {
    path: PathBuf,
}

impl RevisionTracker {
    /// Tracker over an explicit configuration file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Tracker for the standard configuration location of a project root.
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(ProjectConfig::path(project_root))
    }

    /// Path of the underlying configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the tracked revision.
    ///
    /// Fails softly: a missing file, a missing block, or a malformed block
    /// all yield `None`. Callers treat absence as "never synced".
    pub fn read(&self) -> Option<RevisionId> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        kit_blocks::find_revision(&content).map(RevisionId::from)
    }

    /// Persist `revision`, replacing or inserting the tracked-revision
    /// block and leaving all other content byte-for-byte intact.
    ///
    /// When the file has no recognizable `[upstream]` section at all, a
    /// synthesized minimal section is appended instead of failing the run.
    /// Writing the same revision twice produces byte-identical output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigWrite`] only when the file itself cannot be
    /// read (other than not existing) or written.
    pub fn write(&self, revision: &RevisionId) -> Result<()> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(Error::ConfigWrite {
                    path: self.path.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let updated = match kit_blocks::upsert_revision(&content, revision.as_str()) {
            Ok(updated) => updated,
            Err(kit_blocks::Error::SectionNotFound) => {
                tracing::debug!(
                    path = %self.path.display(),
                    "No [upstream] section; appending a synthesized one"
                );
                kit_blocks::append_section(&content, revision.as_str())
            }
        };

        std::fs::write(&self.path, updated).map_err(|e| Error::ConfigWrite {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}
