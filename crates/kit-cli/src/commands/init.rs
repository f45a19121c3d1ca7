//! The init command
//!
//! One-shot scaffolding: materialize the newest revision of the kit,
//! transplant the whole tree into the target directory, record the
//! revision as the baseline. No diffing happens here; that is what
//! `kitsync update` is for.

use std::collections::BTreeSet;
use std::path::Path;

use colored::Colorize;
use dialoguer::Confirm;

use kit_engine::{
    CONFIG_FILE, Materializer, ProjectConfig, ReconciliationPolicy, RevisionTracker, transplant,
};
use kit_vcs::{CommitsApi, GitCli, RevisionSource};

use crate::error::{CliError, Result};
use crate::progress::ConsoleProgress;

pub async fn run_init(
    root: &Path,
    repository: &str,
    url: Option<String>,
    branch: &str,
    yes: bool,
    verbose: bool,
) -> Result<()> {
    let url = url.unwrap_or_else(|| format!("https://github.com/{repository}.git"));

    let tracker = RevisionTracker::for_project(root);
    if tracker.read().is_some() {
        return Err(CliError::user(
            "This project already tracks an upstream kit; use `kitsync update` instead.",
        ));
    }

    if !yes && dir_has_content(root)? {
        let proceed = Confirm::new()
            .with_prompt("This directory is not empty; existing files may be overwritten. Continue?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("Operation cancelled by user.");
            return Ok(());
        }
    }

    println!(
        "{} Scaffolding from {} ({})",
        "=>".blue().bold(),
        repository.cyan(),
        branch
    );

    let revision = CommitsApi::new().latest_revision(repository, branch).await?;

    let vcs = GitCli::new();
    let materializer = Materializer::new(&vcs, &url, branch);
    let staging = ProjectConfig::staging_dir(root);
    let snapshot = materializer.materialize(&revision, &staging).await?;

    let observer = ConsoleProgress::new(verbose);
    let report = transplant(
        root,
        &snapshot,
        ReconciliationPolicy::OverwriteAll,
        &BTreeSet::new(),
        &observer,
    )?;
    snapshot.teardown()?;
    let _ = std::fs::remove_dir(root.join(".kitsync"));

    // Kits usually ship their own kitsync.toml; synthesize one otherwise
    // so the tracked revision has a home.
    if !root.join(CONFIG_FILE).exists() {
        std::fs::write(
            root.join(CONFIG_FILE),
            format!(
                "[upstream]\nrepository = \"{repository}\"\nurl = \"{url}\"\nbranch = \"{branch}\"\n"
            ),
        )?;
    }
    tracker.write(&revision)?;

    println!(
        "{} Scaffolded {} files at revision {}.",
        "OK".green().bold(),
        report.written.len(),
        revision.as_str().cyan()
    );

    Ok(())
}

/// True when the directory holds anything beyond version-control and
/// kitsync bookkeeping.
fn dir_has_content(root: &Path) -> Result<bool> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let name = entry.file_name();
        if name != ".git" && name != ".kitsync" {
            return Ok(true);
        }
    }
    Ok(false)
}
