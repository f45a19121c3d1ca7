//! Snapshot materialization
//!
//! A snapshot is the upstream tree as it existed at one revision,
//! materialized into the staging directory and stripped of
//! version-control metadata. The staging directory holds at most one
//! snapshot; materializing always tears down whatever was there before.

use std::path::{Path, PathBuf};

use kit_fs::RelativePath;
use kit_vcs::{RevisionId, VcsClient};

use crate::error::{Error, Result};

/// An on-disk materialization of the upstream tree at one revision.
///
/// Owned by the run that created it and torn down before the run exits,
/// except when the run fails inside the version-control client or the
/// transplant; then the tree is left in place for inspection.
#[derive(Debug)]
pub struct Snapshot {
    revision: RevisionId,
    root: PathBuf,
}

impl Snapshot {
    pub fn new(revision: RevisionId, root: PathBuf) -> Self {
        Self { revision, root }
    }

    pub fn revision(&self) -> &RevisionId {
        &self.revision
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate the snapshot's files in stable order.
    pub fn files(&self) -> Result<Vec<RelativePath>> {
        Ok(kit_fs::walk_files(&self.root)?)
    }

    /// Delete the snapshot's tree.
    pub fn teardown(self) -> Result<()> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Materializes snapshots of the upstream tree into a staging directory.
pub struct Materializer<'a> {
    vcs: &'a dyn VcsClient,
    url: &'a str,
    branch: &'a str,
}

impl<'a> Materializer<'a> {
    pub fn new(vcs: &'a dyn VcsClient, url: &'a str, branch: &'a str) -> Self {
        Self { vcs, url, branch }
    }

    /// Produce a snapshot of the upstream tree at exactly `revision`.
    ///
    /// Protocol: reset the staging directory (destroying any previous
    /// snapshot there; nothing outside the designated staging path is
    /// ever touched), obtain the branch without a checkout, pin the
    /// working tree to `revision`, then strip version-control metadata.
    ///
    /// # Errors
    ///
    /// Version-control failures surface as [`Error::Vcs`]; on that path
    /// the staging directory is intentionally left as-is.
    pub async fn materialize(&self, revision: &RevisionId, staging: &Path) -> Result<Snapshot> {
        reset_staging(staging)?;

        tracing::debug!(revision = %revision, staging = %staging.display(), "Materializing snapshot");
        self.vcs.clone_branch(self.url, self.branch, staging).await?;
        self.vcs.checkout_revision(staging, revision).await?;
        self.vcs.strip_vcs_metadata(staging).await?;

        Ok(Snapshot::new(revision.clone(), staging.to_path_buf()))
    }
}

/// Ensure `staging` exists and is empty.
fn reset_staging(staging: &Path) -> Result<()> {
    match std::fs::remove_dir_all(staging) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::Io(e)),
    }
    std::fs::create_dir_all(staging).map_err(Error::Io)?;
    Ok(())
}
