//! Reconciliation
//!
//! Transplants a snapshot's files into the live tree under an
//! operator-chosen policy. Runs strictly after classification, strictly
//! serialized: this is the only code in the engine that mutates the live
//! tree.

use std::collections::BTreeSet;
use std::path::Path;

use kit_fs::RelativePath;

use crate::error::{Error, Result};
use crate::progress::{Phase, ProgressObserver, emit};
use crate::snapshot::Snapshot;

/// How conflicts are resolved, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconciliationPolicy {
    /// Every snapshot file replaces its live counterpart unconditionally.
    OverwriteAll,
    /// As OverwriteAll, except files in the conflict set keep their live
    /// content.
    SkipConflicts,
    /// No filesystem change at all.
    Abort,
}

/// What a transplant did: files written and files deliberately skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransplantReport {
    pub written: Vec<RelativePath>,
    pub skipped: Vec<RelativePath>,
}

/// Transplant `snapshot` into `live_root` under `policy`.
///
/// `conflicts` is the classifier's modified set; it only matters under
/// [`ReconciliationPolicy::SkipConflicts`]. Parent directories are
/// created as needed. Under [`ReconciliationPolicy::Abort`] nothing is
/// touched and the report is empty.
///
/// # Errors
///
/// Every planned copy is attempted; if any fail, the run gets
/// [`Error::Transplant`] carrying exactly which paths were written and
/// which failed. Partial application is possible and is never reported
/// as success.
pub fn transplant(
    live_root: &Path,
    snapshot: &Snapshot,
    policy: ReconciliationPolicy,
    conflicts: &BTreeSet<RelativePath>,
    observer: &dyn ProgressObserver,
) -> Result<TransplantReport> {
    if policy == ReconciliationPolicy::Abort {
        return Ok(TransplantReport::default());
    }

    let mut report = TransplantReport::default();
    let mut failed: Vec<(RelativePath, String)> = Vec::new();

    for rel in snapshot.files()? {
        if policy == ReconciliationPolicy::SkipConflicts && conflicts.contains(&rel) {
            tracing::debug!(path = %rel, "Keeping local version");
            report.skipped.push(rel);
            continue;
        }

        let source = rel.under(snapshot.root());
        let target = rel.under(live_root);
        match copy_into_place(&source, &target) {
            Ok(()) => {
                emit(observer, Phase::Apply, Some(rel.to_string()));
                report.written.push(rel);
            }
            Err(e) => {
                tracing::warn!(path = %rel, error = %e, "Transplant step failed");
                failed.push((rel, e.to_string()));
            }
        }
    }

    if !failed.is_empty() {
        return Err(Error::Transplant {
            written: report.written,
            failed,
        });
    }

    Ok(report)
}

fn copy_into_place(source: &Path, target: &Path) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(source, target)?;
    Ok(())
}
