//! End-to-end engine runs over a scripted version-control client.
//!
//! The fake client materializes fixture trees from an in-memory map of
//! revision -> files, so every state-machine path runs for real against
//! temp directories with no network and no git binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use kit_engine::{
    DriftReport, Error, NullObserver, Outcome, Phase, PolicyDecider, ProgressEvent,
    ProgressObserver, ProjectConfig, ReconciliationPolicy, RevisionTracker, UpdateEngine,
};
use kit_fs::{digest_bytes, digest_file, walk_files};
use kit_vcs::{RemoteError, RevisionId, RevisionSource, VcsClient};

/// Body shared by every fixture `kitsync.toml`, with no revision block.
const CONFIG_BODY: &str = "[upstream]\n\
repository = \"acme/starter-kit\"\n\
url = \"https://example.invalid/starter-kit.git\"\n\
branch = \"main\"\n";

type Tree = BTreeMap<&'static str, &'static str>;

/// Version-control client scripted with one full tree per revision.
struct FakeVcs {
    trees: BTreeMap<&'static str, Tree>,
}

impl FakeVcs {
    fn new(trees: BTreeMap<&'static str, Tree>) -> Self {
        Self { trees }
    }
}

#[async_trait]
impl VcsClient for FakeVcs {
    async fn clone_branch(&self, _url: &str, _branch: &str, dest: &Path) -> kit_vcs::Result<()> {
        std::fs::create_dir_all(dest.join(".git")).unwrap();
        std::fs::write(dest.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        Ok(())
    }

    async fn checkout_revision(&self, dest: &Path, revision: &RevisionId) -> kit_vcs::Result<()> {
        let tree = self
            .trees
            .get(revision.as_str())
            .ok_or_else(|| kit_vcs::Error::CommandFailed {
                command: format!("git checkout {revision}"),
                code: Some(1),
                diagnostics: format!("fatal: reference is not a tree: {revision}\n"),
            })?;
        for (rel, content) in tree {
            let path = dest.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, content).unwrap();
        }
        Ok(())
    }

    async fn strip_vcs_metadata(&self, dest: &Path) -> kit_vcs::Result<()> {
        let _ = std::fs::remove_dir_all(dest.join(".git"));
        Ok(())
    }
}

struct FixedRemote(&'static str);

#[async_trait]
impl RevisionSource for FixedRemote {
    async fn latest_revision(
        &self,
        _repository: &str,
        _branch: &str,
    ) -> Result<RevisionId, RemoteError> {
        Ok(RevisionId::new(self.0))
    }
}

/// Decider that returns a fixed policy and records every consultation.
struct ScriptedPolicy {
    policy: ReconciliationPolicy,
    consulted: Mutex<Vec<DriftReport>>,
}

impl ScriptedPolicy {
    fn new(policy: ReconciliationPolicy) -> Self {
        Self {
            policy,
            consulted: Mutex::new(Vec::new()),
        }
    }

    fn consultations(&self) -> Vec<DriftReport> {
        self.consulted.lock().unwrap().clone()
    }
}

impl PolicyDecider for ScriptedPolicy {
    fn decide(&self, report: &DriftReport) -> ReconciliationPolicy {
        self.consulted.lock().unwrap().push(report.clone());
        self.policy
    }
}

/// Decider for runs that must never reach the policy prompt.
struct NeverDecide;

impl PolicyDecider for NeverDecide {
    fn decide(&self, _report: &DriftReport) -> ReconciliationPolicy {
        panic!("policy decider must not be consulted");
    }
}

/// Observer recording every event, for ordering assertions.
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingObserver {
    fn phases(&self) -> Vec<Phase> {
        let mut out: Vec<Phase> = Vec::new();
        for event in self.events.lock().unwrap().iter() {
            if out.last() != Some(&event.phase) {
                out.push(event.phase);
            }
        }
        out
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_event(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn write_live(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Lay down a live project tracking `tracked`, then build the engine.
fn engine_for(
    root: &Path,
    tracked: &str,
    remote: &'static str,
    trees: BTreeMap<&'static str, Tree>,
) -> UpdateEngine {
    write_live(
        root,
        "kitsync.toml",
        &format!("{CONFIG_BODY}# kitsync tracked revision - do not edit\nrevision = \"{tracked}\"\n"),
    );
    let config = ProjectConfig::load(root).unwrap();
    UpdateEngine::new(
        root,
        config,
        Box::new(FakeVcs::new(trees)),
        Box::new(FixedRemote(remote)),
    )
}

fn prior_tree() -> Tree {
    Tree::from([
        ("x.txt", "h1"),
        ("y.txt", "h2"),
        ("kitsync.toml", CONFIG_BODY),
    ])
}

fn latest_tree() -> Tree {
    Tree::from([
        ("x.txt", "new x"),
        ("y.txt", "new y"),
        ("docs/z.txt", "brand new"),
        ("kitsync.toml", CONFIG_BODY),
    ])
}

fn both_trees() -> BTreeMap<&'static str, Tree> {
    BTreeMap::from([("aaa111", prior_tree()), ("bbb222", latest_tree())])
}

fn staging_of(root: &Path) -> PathBuf {
    ProjectConfig::staging_dir(root)
}

fn tracked_of(root: &Path) -> Option<RevisionId> {
    RevisionTracker::for_project(root).read()
}

/// Digest every file in the live tree, keyed by relative path.
fn live_digests(root: &Path) -> BTreeMap<String, String> {
    walk_files(root)
        .unwrap()
        .into_iter()
        .map(|rel| {
            let digest = digest_file(&rel.under(root)).unwrap();
            (rel.as_str().to_string(), digest.as_str().to_string())
        })
        .collect()
}

#[tokio::test]
async fn up_to_date_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "aaa111", both_trees());
    let before = std::fs::read(dir.path().join("kitsync.toml")).unwrap();

    let outcome = engine.run(&NeverDecide, &NullObserver).await.unwrap();

    assert!(matches!(outcome, Outcome::UpToDate { revision } if revision.as_str() == "aaa111"));
    assert_eq!(std::fs::read(dir.path().join("kitsync.toml")).unwrap(), before);
    assert!(!dir.path().join(".kitsync").exists());
}

#[tokio::test]
async fn clean_tree_fast_forwards_to_the_newest_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h2");

    let outcome = engine.run(&NeverDecide, &NullObserver).await.unwrap();

    match outcome {
        Outcome::FastForwarded {
            from,
            to,
            written,
            persist_warning,
        } => {
            assert_eq!(from.as_str(), "aaa111");
            assert_eq!(to.as_str(), "bbb222");
            assert_eq!(written, latest_tree().len());
            assert_eq!(persist_warning, None);
        }
        other => panic!("expected FastForwarded, got {other:?}"),
    }

    // Every file present in the newest snapshot now matches it exactly.
    for (rel, content) in latest_tree() {
        if rel == "kitsync.toml" {
            continue; // rewritten below by the tracker
        }
        assert_eq!(
            digest_file(&dir.path().join(rel)).unwrap(),
            digest_bytes(content.as_bytes()),
            "{rel} should match the newest snapshot"
        );
    }
    assert_eq!(tracked_of(dir.path()), Some(RevisionId::new("bbb222")));
    assert!(!staging_of(dir.path()).exists());
}

#[tokio::test]
async fn skip_conflicts_keeps_local_edits_and_applies_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h9"); // local edit

    let decider = ScriptedPolicy::new(ReconciliationPolicy::SkipConflicts);
    let outcome = engine.run(&decider, &NullObserver).await.unwrap();

    match outcome {
        Outcome::Reconciled {
            from,
            to,
            written,
            skipped,
            persist_warning,
        } => {
            assert_eq!(from.as_str(), "aaa111");
            assert_eq!(to.as_str(), "bbb222");
            assert_eq!(written, 3);
            assert_eq!(skipped, 1);
            assert_eq!(persist_warning, None);
        }
        other => panic!("expected Reconciled, got {other:?}"),
    }

    // The conflicting file kept its live content; everything else matches
    // the newest snapshot, including a file added upstream.
    assert_eq!(
        std::fs::read_to_string(dir.path().join("y.txt")).unwrap(),
        "h9"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("x.txt")).unwrap(),
        "new x"
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("docs/z.txt")).unwrap(),
        "brand new"
    );
    assert_eq!(tracked_of(dir.path()), Some(RevisionId::new("bbb222")));
    assert!(!staging_of(dir.path()).exists());

    // The prompt was consulted exactly once, with exactly the drift found.
    let consultations = decider.consultations();
    assert_eq!(consultations.len(), 1);
    let report = &consultations[0];
    assert!(report.missing.is_empty());
    assert_eq!(
        report.modified.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        vec!["y.txt"]
    );
}

#[tokio::test]
async fn abort_leaves_tree_and_tracked_revision_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h9");
    let before = live_digests(dir.path());

    let decider = ScriptedPolicy::new(ReconciliationPolicy::Abort);
    let outcome = engine.run(&decider, &NullObserver).await.unwrap();

    assert!(matches!(outcome, Outcome::Aborted { .. }));
    assert_eq!(live_digests(dir.path()), before);
    assert_eq!(tracked_of(dir.path()), Some(RevisionId::new("aaa111")));
    assert!(!staging_of(dir.path()).exists());
}

#[tokio::test]
async fn missing_baseline_files_are_restored_under_skip_conflicts() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    // y.txt was deleted locally.

    let decider = ScriptedPolicy::new(ReconciliationPolicy::SkipConflicts);
    engine.run(&decider, &NullObserver).await.unwrap();

    // A missing file is not a conflict; it comes back at the new content.
    assert_eq!(
        std::fs::read_to_string(dir.path().join("y.txt")).unwrap(),
        "new y"
    );
    let report = &decider.consultations()[0];
    assert_eq!(
        report.missing.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        vec!["y.txt"]
    );
    assert!(report.modified.is_empty());
}

#[tokio::test]
async fn ignored_paths_are_excluded_from_drift_but_not_from_transplant() {
    let dir = tempfile::tempdir().unwrap();
    write_live(
        dir.path(),
        "kitsync.toml",
        &format!(
            "{CONFIG_BODY}# kitsync tracked revision - do not edit\nrevision = \"aaa111\"\n\n[update]\nignore = [\"y.txt\"]\n"
        ),
    );
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "customized"); // diverged but ignored

    let config = ProjectConfig::load(dir.path()).unwrap();
    let engine = UpdateEngine::new(
        dir.path(),
        config,
        Box::new(FakeVcs::new(both_trees())),
        Box::new(FixedRemote("bbb222")),
    );

    // No drift is reported, so no policy is needed...
    let outcome = engine.run(&NeverDecide, &NullObserver).await.unwrap();
    assert!(matches!(outcome, Outcome::FastForwarded { .. }));

    // ...and the transplant still carries the ignored path forward.
    assert_eq!(
        std::fs::read_to_string(dir.path().join("y.txt")).unwrap(),
        "new y"
    );
}

#[tokio::test]
async fn vcs_failure_is_fatal_and_leaves_staging_for_inspection() {
    let dir = tempfile::tempdir().unwrap();
    // Only the prior revision exists; materializing the newest one fails.
    let trees = BTreeMap::from([("aaa111", prior_tree())]);
    let engine = engine_for(dir.path(), "aaa111", "bbb222", trees);
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h2");

    let err = engine.run(&NeverDecide, &NullObserver).await.unwrap_err();

    assert!(matches!(err, Error::Vcs(_)));
    assert!(staging_of(dir.path()).exists());
    assert_eq!(tracked_of(dir.path()), Some(RevisionId::new("aaa111")));
}

#[tokio::test]
async fn scan_reports_drift_without_mutating_anything() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h9");
    let before = live_digests(dir.path());

    let summary = engine.scan(&NullObserver).await.unwrap();

    assert!(!summary.up_to_date());
    assert_eq!(summary.local.as_str(), "aaa111");
    assert_eq!(summary.remote.as_str(), "bbb222");
    assert_eq!(
        summary.drift.modified.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
        vec!["y.txt"]
    );
    assert_eq!(live_digests(dir.path()), before);
    assert!(!staging_of(dir.path()).exists());
}

#[tokio::test]
async fn progress_phases_arrive_in_state_machine_order() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h9");

    let decider = ScriptedPolicy::new(ReconciliationPolicy::OverwriteAll);
    let observer = RecordingObserver::default();
    engine.run(&decider, &observer).await.unwrap();

    assert_eq!(
        observer.phases(),
        vec![
            Phase::ResolveLocal,
            Phase::ResolveRemote,
            Phase::MaterializePrior,
            Phase::Scan,
            Phase::MaterializeLatest,
            Phase::Apply,
            Phase::Finalize,
        ]
    );
}

#[tokio::test]
async fn overwrite_all_replaces_conflicting_files() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_for(dir.path(), "aaa111", "bbb222", both_trees());
    write_live(dir.path(), "x.txt", "h1");
    write_live(dir.path(), "y.txt", "h9");
    write_live(dir.path(), "local-only.md", "mine");

    let decider = ScriptedPolicy::new(ReconciliationPolicy::OverwriteAll);
    let outcome = engine.run(&decider, &NullObserver).await.unwrap();

    match outcome {
        Outcome::Reconciled {
            written, skipped, ..
        } => {
            assert_eq!(written, latest_tree().len());
            assert_eq!(skipped, 0);
        }
        other => panic!("expected Reconciled, got {other:?}"),
    }
    assert_eq!(
        std::fs::read_to_string(dir.path().join("y.txt")).unwrap(),
        "new y"
    );
    // Files the baseline never knew about stay untouched under any policy.
    assert_eq!(
        std::fs::read_to_string(dir.path().join("local-only.md")).unwrap(),
        "mine"
    );
}
