//! Structured progress events
//!
//! The engine reports what it is doing as plain data. A presentation
//! layer (the CLI, a test recorder) subscribes through
//! [`ProgressObserver`]; the engine itself never writes to a terminal.

use serde::Serialize;

/// The phase an event belongs to, in state-machine order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Reading the tracked revision.
    ResolveLocal,
    /// Querying the newest upstream revision.
    ResolveRemote,
    /// Materializing the tracked-revision snapshot.
    MaterializePrior,
    /// Classifying the live tree against the snapshot.
    Scan,
    /// Materializing the newest-revision snapshot.
    MaterializeLatest,
    /// Transplanting files into the live tree.
    Apply,
    /// Persisting the tracked revision and tearing down staging.
    Finalize,
}

impl Phase {
    /// Short human-readable label for presentation layers.
    pub fn describe(&self) -> &'static str {
        match self {
            Phase::ResolveLocal => "Reading tracked revision",
            Phase::ResolveRemote => "Resolving newest upstream revision",
            Phase::MaterializePrior => "Fetching baseline snapshot",
            Phase::Scan => "Checking local files against baseline",
            Phase::MaterializeLatest => "Fetching newest snapshot",
            Phase::Apply => "Applying upstream files",
            Phase::Finalize => "Recording new baseline",
        }
    }
}

/// One progress event: a phase, optionally refined by a detail string
/// (typically a file path or revision).
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub detail: Option<String>,
}

/// Consumer of progress events.
pub trait ProgressObserver: Send + Sync {
    fn on_event(&self, event: &ProgressEvent);
}

/// Observer that discards everything.
#[derive(Debug, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_event(&self, _event: &ProgressEvent) {}
}

pub(crate) fn emit(observer: &dyn ProgressObserver, phase: Phase, detail: Option<String>) {
    observer.on_event(&ProgressEvent { phase, detail });
}
