//! Error types for version-control client operations

use std::path::PathBuf;

/// Result type for version-control client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the version-control client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {code:?}\n{diagnostics}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        diagnostics: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
