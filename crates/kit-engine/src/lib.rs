//! Drift detection and reconciliation engine for kitsync
//!
//! The engine answers one question and acts on the answer: given the
//! upstream revision this project was last synced to and the newest
//! revision available, which local files have diverged from their
//! baseline, and how should the tree be brought forward without
//! destroying local edits?
//!
//! The flow, per run: read the tracked revision, resolve the newest
//! upstream revision, short-circuit when they match; otherwise
//! materialize the tracked revision into the staging directory, classify
//! every baseline file as unchanged, modified, or missing against the
//! live tree, then transplant the newest revision under an
//! operator-chosen policy and advance the tracked revision.
//!
//! The engine never prints, prompts, or exits: progress is emitted as
//! structured events, the policy arrives through [`PolicyDecider`], and
//! every run ends in a `Result<Outcome, Error>` for the caller to
//! translate.

pub mod config;
pub mod drift;
pub mod error;
pub mod progress;
pub mod reconcile;
pub mod snapshot;
pub mod tracker;
pub mod update;

pub use config::{CONFIG_FILE, ProjectConfig, STAGING_DIR};
pub use drift::{DriftReport, classify};
pub use error::{Error, Result};
pub use progress::{NullObserver, Phase, ProgressEvent, ProgressObserver};
pub use reconcile::{ReconciliationPolicy, TransplantReport, transplant};
pub use snapshot::{Materializer, Snapshot};
pub use tracker::RevisionTracker;
pub use update::{Outcome, PolicyDecider, StatusSummary, UpdateEngine};
