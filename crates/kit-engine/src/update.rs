//! The update run
//!
//! Drives the whole engine through its state machine:
//!
//! ```text
//! START -> resolve local -> resolve remote -> UP_TO_DATE (terminal)
//!                                          -> materialize prior -> classify
//!                                             -> no drift  -> fast-forward (terminal)
//!                                             -> drift     -> await policy
//!                                                -> abort  (terminal)
//!                                                -> apply  -> done (terminal)
//! ```
//!
//! The run never prompts and never exits the process; the policy comes in
//! through [`PolicyDecider`] and every terminal state is a value of
//! [`Outcome`].

use std::path::PathBuf;

use kit_vcs::{RevisionId, RevisionSource, VcsClient};

use crate::config::ProjectConfig;
use crate::drift::{DriftReport, classify};
use crate::error::{Error, Result};
use crate::progress::{Phase, ProgressObserver, emit};
use crate::reconcile::{ReconciliationPolicy, transplant};
use crate::snapshot::Materializer;
use crate::tracker::RevisionTracker;

/// Supplies the reconciliation policy when drift is found.
///
/// Consulted at most once per run, and only when the drift report is
/// non-empty; a clean tree fast-forwards without a decision.
pub trait PolicyDecider: Send + Sync {
    fn decide(&self, report: &DriftReport) -> ReconciliationPolicy;
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum Outcome {
    /// The tracked revision already matches the newest upstream revision.
    /// Nothing was written anywhere.
    UpToDate { revision: RevisionId },

    /// No local drift existed; the newest snapshot was applied wholesale.
    FastForwarded {
        from: RevisionId,
        to: RevisionId,
        written: usize,
        persist_warning: Option<String>,
    },

    /// Drift existed and a non-abort policy was applied.
    Reconciled {
        from: RevisionId,
        to: RevisionId,
        written: usize,
        skipped: usize,
        persist_warning: Option<String>,
    },

    /// The operator chose to abort; the tree and the tracked revision are
    /// untouched.
    Aborted { from: RevisionId, to: RevisionId },
}

/// Read-only drift summary, for status reporting.
#[derive(Debug)]
pub struct StatusSummary {
    pub local: RevisionId,
    pub remote: RevisionId,
    pub drift: DriftReport,
}

impl StatusSummary {
    pub fn up_to_date(&self) -> bool {
        self.local == self.remote
    }
}

/// The drift-detection and reconciliation engine for one project root.
pub struct UpdateEngine {
    root: PathBuf,
    config: ProjectConfig,
    vcs: Box<dyn VcsClient>,
    remote: Box<dyn RevisionSource>,
}

impl UpdateEngine {
    pub fn new(
        root: impl Into<PathBuf>,
        config: ProjectConfig,
        vcs: Box<dyn VcsClient>,
        remote: Box<dyn RevisionSource>,
    ) -> Self {
        Self {
            root: root.into(),
            config,
            vcs,
            remote,
        }
    }

    /// Run the full update state machine.
    ///
    /// # Errors
    ///
    /// Any fatal condition from the taxonomy in [`crate::error`]. A
    /// failure to persist the tracked revision *after* a fully successful
    /// transplant is not fatal: the filesystem already matches upstream,
    /// so it is demoted to `persist_warning` on the outcome and the next
    /// run will simply re-check against the old baseline.
    pub async fn run(
        &self,
        decider: &dyn PolicyDecider,
        observer: &dyn ProgressObserver,
    ) -> Result<Outcome> {
        let tracker = RevisionTracker::for_project(&self.root);

        emit(observer, Phase::ResolveLocal, None);
        let local = self.tracked_revision(&tracker)?;
        tracing::info!(revision = %local, "Tracked upstream revision");

        emit(observer, Phase::ResolveRemote, Some(self.config.upstream.branch.clone()));
        let remote = self
            .remote
            .latest_revision(&self.config.upstream.repository, &self.config.upstream.branch)
            .await?;
        tracing::info!(revision = %remote, "Newest upstream revision");

        if local == remote {
            return Ok(Outcome::UpToDate { revision: local });
        }

        let staging = ProjectConfig::staging_dir(&self.root);
        let materializer = Materializer::new(
            self.vcs.as_ref(),
            &self.config.upstream.url,
            &self.config.upstream.branch,
        );

        emit(observer, Phase::MaterializePrior, Some(local.to_string()));
        let prior = materializer.materialize(&local, &staging).await?;

        let report = classify(&self.root, &prior, &self.config.effective_ignore(), observer).await?;

        let policy = if report.is_clean() {
            ReconciliationPolicy::OverwriteAll
        } else {
            tracing::info!(
                modified = report.modified.len(),
                missing = report.missing.len(),
                "Local tree has diverged from its baseline"
            );
            decider.decide(&report)
        };

        if policy == ReconciliationPolicy::Abort {
            prior.teardown()?;
            remove_staging_parent(&staging);
            return Ok(Outcome::Aborted {
                from: local,
                to: remote,
            });
        }

        emit(observer, Phase::MaterializeLatest, Some(remote.to_string()));
        drop(prior); // the staging reset below invalidates it
        let latest = materializer.materialize(&remote, &staging).await?;

        let transplanted = transplant(&self.root, &latest, policy, report.conflicts(), observer)?;

        emit(observer, Phase::Finalize, Some(remote.to_string()));
        let persist_warning = match tracker.write(&remote) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Files are updated but the tracked revision was not persisted");
                Some(e.to_string())
            }
        };
        latest.teardown()?;
        remove_staging_parent(&staging);

        Ok(if report.is_clean() {
            Outcome::FastForwarded {
                from: local,
                to: remote,
                written: transplanted.written.len(),
                persist_warning,
            }
        } else {
            Outcome::Reconciled {
                from: local,
                to: remote,
                written: transplanted.written.len(),
                skipped: transplanted.skipped.len(),
                persist_warning,
            }
        })
    }

    /// Resolve both revisions and classify drift without mutating
    /// anything outside the staging directory, which is torn down before
    /// returning.
    pub async fn scan(&self, observer: &dyn ProgressObserver) -> Result<StatusSummary> {
        let tracker = RevisionTracker::for_project(&self.root);

        emit(observer, Phase::ResolveLocal, None);
        let local = self.tracked_revision(&tracker)?;

        emit(observer, Phase::ResolveRemote, Some(self.config.upstream.branch.clone()));
        let remote = self
            .remote
            .latest_revision(&self.config.upstream.repository, &self.config.upstream.branch)
            .await?;

        let staging = ProjectConfig::staging_dir(&self.root);
        let materializer = Materializer::new(
            self.vcs.as_ref(),
            &self.config.upstream.url,
            &self.config.upstream.branch,
        );

        emit(observer, Phase::MaterializePrior, Some(local.to_string()));
        let prior = materializer.materialize(&local, &staging).await?;

        let drift = classify(&self.root, &prior, &self.config.effective_ignore(), observer).await?;
        prior.teardown()?;
        remove_staging_parent(&staging);

        Ok(StatusSummary {
            local,
            remote,
            drift,
        })
    }

    fn tracked_revision(&self, tracker: &RevisionTracker) -> Result<RevisionId> {
        tracker.read().ok_or_else(|| Error::NotTracked {
            path: tracker.path().to_path_buf(),
        })
    }
}

/// Remove the staging directory's bookkeeping parent when nothing else is
/// left in it.
fn remove_staging_parent(staging: &std::path::Path) {
    if let Some(parent) = staging.parent() {
        let _ = std::fs::remove_dir(parent);
    }
}
