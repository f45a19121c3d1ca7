//! Project configuration
//!
//! A kitsync-managed project carries a `kitsync.toml` at its root naming
//! the upstream kit and, under the same roof, the tracked-revision block
//! maintained by [`crate::tracker`]. This module reads the typed settings;
//! the tracked revision is deliberately *not* part of the typed view (it
//! is edited as opaque text to keep writes byte-precise).

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use kit_fs::RelativePath;

use crate::error::{Error, Result};

/// Name of the configuration file at the project root.
pub const CONFIG_FILE: &str = "kitsync.toml";

/// Staging directory for snapshot materialization, relative to the
/// project root.
pub const STAGING_DIR: &str = ".kitsync/staging";

/// Typed view of `kitsync.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

/// The `[upstream]` section: where the kit lives.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// `owner/name` slug used against the metadata API.
    pub repository: String,
    /// Clone URL handed to the version-control client.
    pub url: String,
    /// Named branch to follow.
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Present in the file as the tracked-revision block; accepted here so
    /// the typed parse tolerates it, but never read through this field.
    #[serde(default)]
    #[allow(dead_code)]
    revision: Option<String>,
}

/// The `[update]` section: how reconciliation behaves.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateConfig {
    /// Paths excluded from drift classification entirely.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

impl ProjectConfig {
    /// Load the configuration from `<root>/kitsync.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigRead`] if the file is missing or not valid
    /// TOML. This is checked before any network or filesystem action.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = Self::path(project_root);
        let content = std::fs::read_to_string(&path).map_err(|e| Error::ConfigRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| Error::ConfigRead {
            path,
            reason: e.to_string(),
        })
    }

    /// Location of the configuration file for a project root.
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE)
    }

    /// Location of the staging directory for a project root.
    pub fn staging_dir(project_root: &Path) -> PathBuf {
        project_root.join(STAGING_DIR)
    }

    /// The full ignore set for drift classification: the configured list
    /// plus the configuration file itself, which always diverges (it
    /// holds the tracked revision).
    pub fn effective_ignore(&self) -> BTreeSet<RelativePath> {
        let mut ignore: BTreeSet<RelativePath> = self
            .update
            .ignore
            .iter()
            .map(RelativePath::new)
            .collect();
        ignore.insert(RelativePath::new(CONFIG_FILE));
        ignore
    }
}
