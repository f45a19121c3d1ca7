//! The status command
//!
//! Read-only: resolves both revisions, classifies drift against the
//! baseline, prints the report, changes nothing.

use std::path::Path;

use colored::Colorize;

use kit_engine::{ProjectConfig, UpdateEngine};
use kit_vcs::{CommitsApi, GitCli};

use crate::error::Result;
use crate::progress::ConsoleProgress;

pub async fn run_status(root: &Path, verbose: bool) -> Result<()> {
    let config = ProjectConfig::load(root)?;
    let engine = UpdateEngine::new(
        root,
        config,
        Box::new(GitCli::new()),
        Box::new(CommitsApi::new()),
    );

    let observer = ConsoleProgress::new(verbose);
    let summary = engine.scan(&observer).await?;

    println!();
    if summary.up_to_date() {
        println!(
            "{} Tracking the newest upstream revision {}.",
            "OK".green().bold(),
            summary.local.as_str().cyan()
        );
    } else {
        println!(
            "{} Upstream has moved: {} -> {}.",
            "BEHIND".yellow().bold(),
            summary.local.as_str().cyan(),
            summary.remote.as_str().cyan()
        );
    }

    if summary.drift.is_clean() {
        println!(
            "{} Local files match the baseline exactly.",
            "OK".green().bold()
        );
    } else {
        println!(
            "{} {} file(s) have diverged from the baseline:",
            "DRIFT".red().bold(),
            summary.drift.total()
        );
        for path in &summary.drift.missing {
            println!("   {} missing:  {}", "-".yellow(), path.as_str().cyan());
        }
        for path in &summary.drift.modified {
            println!("   {} modified: {}", "!".red(), path.as_str().cyan());
        }
    }

    if !summary.up_to_date() {
        println!();
        println!("Run {} to bring the project forward.", "kitsync update".cyan());
    }

    Ok(())
}
