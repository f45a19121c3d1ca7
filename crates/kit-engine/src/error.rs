//! Error types for the kitsync engine

use std::path::PathBuf;

use kit_fs::RelativePath;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during an engine run.
///
/// Every variant is fatal to the run that raises it; none are silently
/// swallowed. The one deliberate demotion happens in the update flow:
/// a [`Error::ConfigWrite`] raised *after* a fully successful transplant
/// becomes a warning on the outcome, because the filesystem is already
/// correct and the next run will simply re-check against the old
/// baseline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Project configuration missing or unparsable. Raised before any
    /// network or filesystem action.
    #[error("Cannot read project configuration at {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    /// No tracked upstream revision recorded for this project.
    #[error("No tracked upstream revision in {path}; this tree was never synced")]
    NotTracked { path: PathBuf },

    /// Remote revision query failed.
    #[error(transparent)]
    Remote(#[from] kit_vcs::RemoteError),

    /// Version-control client failed. The staging directory is left in
    /// place for inspection.
    #[error(transparent)]
    Vcs(#[from] kit_vcs::Error),

    /// Filesystem-level failure (walking, digesting).
    #[error(transparent)]
    Fs(#[from] kit_fs::Error),

    /// Transplant failed partway. `written` lists every file that was
    /// applied before termination; `failed` pairs each failing path with
    /// its cause. The tracked revision is never advanced on this error.
    #[error("Transplant incomplete: {} file(s) applied, {} failed", .written.len(), .failed.len())]
    Transplant {
        written: Vec<RelativePath>,
        failed: Vec<(RelativePath, String)>,
    },

    /// Tracked revision could not be persisted.
    #[error("Cannot persist tracked revision to {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
