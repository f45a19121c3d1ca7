//! The update command
//!
//! Wires the engine to the real world: `git` as the version-control
//! client, the hosting provider's commits API as the revision source, and
//! the interactive prompts as the policy decider.

use std::path::Path;

use colored::Colorize;

use kit_engine::{Outcome, ProjectConfig, UpdateEngine};
use kit_vcs::{CommitsApi, GitCli};

use crate::error::Result;
use crate::progress::ConsoleProgress;
use crate::prompt::{PolicyPrompt, confirm_update};

pub async fn run_update(root: &Path, yes: bool, verbose: bool) -> Result<()> {
    if !confirm_update(yes)? {
        println!("Aborted by user. No changes were made.");
        return Ok(());
    }

    let config = ProjectConfig::load(root)?;
    let engine = UpdateEngine::new(
        root,
        config,
        Box::new(GitCli::new()),
        Box::new(CommitsApi::new()),
    );

    let observer = ConsoleProgress::new(verbose);
    let outcome = engine.run(&PolicyPrompt, &observer).await?;

    match outcome {
        Outcome::UpToDate { revision } => {
            println!(
                "{} Already up to date at {}.",
                "OK".green().bold(),
                revision.as_str().cyan()
            );
        }
        Outcome::FastForwarded {
            from,
            to,
            written,
            persist_warning,
        } => {
            println!(
                "{} Local tree matched its baseline; fast-forwarded {} -> {} ({} files).",
                "OK".green().bold(),
                from.as_str().cyan(),
                to.as_str().cyan(),
                written
            );
            warn_unpersisted(persist_warning);
        }
        Outcome::Reconciled {
            from,
            to,
            written,
            skipped,
            persist_warning,
        } => {
            println!(
                "{} Updated {} -> {}: {} files applied, {} kept local.",
                "OK".green().bold(),
                from.as_str().cyan(),
                to.as_str().cyan(),
                written,
                skipped
            );
            warn_unpersisted(persist_warning);
        }
        Outcome::Aborted { .. } => {
            println!("Exiting without changes.");
        }
    }

    Ok(())
}

fn warn_unpersisted(persist_warning: Option<String>) {
    if let Some(warning) = persist_warning {
        println!(
            "{} Files are updated, but the new baseline could not be recorded: {}",
            "WARNING".yellow().bold(),
            warning
        );
        println!("The next update will re-check against the old baseline, which is safe.");
    }
}
