//! Drift classification
//!
//! Compares the live project tree against the snapshot of the revision it
//! was last synced to. The snapshot is the reference set: every one of
//! its files (outside the ignore list) lands in exactly one of three
//! buckets: unchanged, modified, or missing. Files that exist only
//! locally were never part of the baseline and are left alone entirely.

use std::collections::BTreeSet;
use std::path::Path;

use futures::stream::{self, StreamExt};

use kit_fs::{RelativePath, digest_file};

use crate::error::{Error, Result};
use crate::progress::{Phase, ProgressObserver, emit};
use crate::snapshot::Snapshot;

/// Upper bound on concurrent digest workers.
const HASH_WORKERS: usize = 8;

/// The classifier's output: the two non-trivial buckets, as disjoint
/// sorted sets. Everything else in the reference set is unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DriftReport {
    /// Present in the baseline snapshot but absent locally.
    pub missing: BTreeSet<RelativePath>,
    /// Present in both, with differing content digests.
    pub modified: BTreeSet<RelativePath>,
}

impl DriftReport {
    /// True when the live tree matches the baseline exactly.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.modified.is_empty()
    }

    /// The conflict set consumed by reconciliation: locally modified
    /// files. Missing files are not conflicts; every policy restores
    /// them.
    pub fn conflicts(&self) -> &BTreeSet<RelativePath> {
        &self.modified
    }

    /// Total number of diverged files.
    pub fn total(&self) -> usize {
        self.missing.len() + self.modified.len()
    }
}

enum FileState {
    Unchanged,
    Missing,
    Modified,
}

/// Classify the live tree against the baseline snapshot.
///
/// Digest pairs are computed concurrently on blocking workers, bounded by
/// [`HASH_WORKERS`], and merged back in path order, so completion order
/// never influences the report. The classification itself has no side
/// effects.
///
/// # Errors
///
/// Fails if the snapshot cannot be walked or a present file cannot be
/// read for digesting. A failure to stat a live path is not an error;
/// the file is simply recorded as missing.
pub async fn classify(
    live_root: &Path,
    prior: &Snapshot,
    ignore: &BTreeSet<RelativePath>,
    observer: &dyn ProgressObserver,
) -> Result<DriftReport> {
    let reference: Vec<RelativePath> = prior
        .files()?
        .into_iter()
        .filter(|path| !ignore.contains(path))
        .collect();

    tracing::debug!(files = reference.len(), "Classifying drift against baseline");

    let outcomes: Vec<std::result::Result<(RelativePath, FileState), Error>> =
        stream::iter(reference.into_iter().map(|rel| {
            let live_path = rel.under(live_root);
            let prior_path = rel.under(prior.root());
            async move {
                let state = tokio::task::spawn_blocking(move || {
                    compare_pair(&live_path, &prior_path)
                })
                .await
                .map_err(|e| Error::Io(std::io::Error::other(e)))??;
                Ok((rel, state))
            }
        }))
        .buffer_unordered(HASH_WORKERS)
        .collect()
        .await;

    let mut states = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        states.push(outcome?);
    }
    states.sort_by(|a, b| a.0.cmp(&b.0));

    let mut report = DriftReport::default();
    for (rel, state) in states {
        emit(observer, Phase::Scan, Some(rel.to_string()));
        match state {
            FileState::Unchanged => {}
            FileState::Missing => {
                report.missing.insert(rel);
            }
            FileState::Modified => {
                report.modified.insert(rel);
            }
        }
    }

    Ok(report)
}

/// Compare one baseline file against its live counterpart.
fn compare_pair(live: &Path, prior: &Path) -> kit_fs::Result<FileState> {
    // An unstattable live path counts as absent, not as a failure.
    if std::fs::metadata(live).is_err() {
        return Ok(FileState::Missing);
    }

    let prior_digest = digest_file(prior)?;
    let live_digest = digest_file(live)?;

    Ok(if live_digest == prior_digest {
        FileState::Unchanged
    } else {
        FileState::Modified
    })
}
