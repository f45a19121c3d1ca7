//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// kitsync - keep a scaffolded project in sync with its upstream kit
#[derive(Parser, Debug)]
#[command(name = "kitsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Bring the project forward to the newest upstream revision
    ///
    /// Resolves the newest revision of the upstream branch, checks every
    /// file of the recorded baseline against the local tree, and applies
    /// the upstream files under a policy you choose when local edits are
    /// found.
    ///
    /// Examples:
    ///   kitsync update          # interactive update
    ///   kitsync update --yes    # skip the opening confirmation
    Update {
        /// Skip the destructive-action confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show how the local tree has drifted from its upstream baseline
    Status,

    /// Scaffold a new project from an upstream kit
    ///
    /// Clones the newest revision of the kit into the current directory
    /// and records that revision as the project's baseline.
    ///
    /// Examples:
    ///   kitsync init acme/starter-kit
    ///   kitsync init acme/starter-kit --branch stable
    Init {
        /// Upstream repository as an owner/name slug
        repository: String,

        /// Clone URL (defaults to the GitHub URL for the slug)
        #[arg(long)]
        url: Option<String>,

        /// Upstream branch to follow
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Skip the overwrite confirmation
        #[arg(short, long)]
        yes: bool,
    },
}
