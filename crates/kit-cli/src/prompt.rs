//! Interactive prompts
//!
//! All operator interaction lives here, at the CLI boundary. The engine
//! only ever sees the resulting policy value.

use colored::Colorize;
use dialoguer::{Confirm, Input};

use kit_engine::{DriftReport, PolicyDecider, ReconciliationPolicy};

use crate::error::Result;

/// Opening confirmation for `kitsync update`.
///
/// Returns `false` when the operator declines; the caller exits cleanly
/// without touching anything.
pub fn confirm_update(skip: bool) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    println!();
    println!(
        "{}",
        "WARNING: this can seriously damage your project!".white().on_red().bold()
    );
    println!(
        "{}",
        "Upstream files will be pulled over your local tree. Commit any unsaved\n\
         changes and make sure you are on an appropriate branch before continuing."
            .yellow()
    );
    println!();

    Ok(Confirm::new()
        .with_prompt("Continue?")
        .default(false)
        .interact()?)
}

/// Policy prompt consulted by the engine when drift is found.
///
/// Prints the drift report, then reads one answer from the fixed set
/// {O, S, E} (case-insensitive), re-prompting until the input is valid.
pub struct PolicyPrompt;

impl PolicyDecider for PolicyPrompt {
    fn decide(&self, report: &DriftReport) -> ReconciliationPolicy {
        println!();
        println!(
            "{}",
            "The following files have been modified or are missing:"
                .yellow()
                .bold()
        );
        for path in &report.missing {
            println!("   {} missing:  {}", "-".yellow(), path.as_str().cyan());
        }
        for path in &report.modified {
            println!("   {} modified: {}", "!".red(), path.as_str().cyan());
        }
        println!();

        loop {
            let answer: String = match Input::new()
                .with_prompt("Overwrite all (o), skip conflicted files (s), exit (e)")
                .interact_text()
            {
                Ok(answer) => answer,
                Err(e) => {
                    // No usable terminal; the only safe choice is to stop.
                    tracing::warn!(error = %e, "Policy prompt unavailable; aborting");
                    return ReconciliationPolicy::Abort;
                }
            };

            match answer.trim().to_lowercase().as_str() {
                "o" => return ReconciliationPolicy::OverwriteAll,
                "s" => return ReconciliationPolicy::SkipConflicts,
                "e" => return ReconciliationPolicy::Abort,
                _ => println!("Please answer o, s, or e."),
            }
        }
    }
}
