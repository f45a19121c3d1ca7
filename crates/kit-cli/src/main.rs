//! kitsync CLI
//!
//! The command-line boundary: argument parsing, prompt wiring, tracing
//! setup, and the single place where a run's result becomes a process
//! exit code. Exit 0 covers success, "already up to date", a declined
//! confirmation, and an operator abort; every fatal error exits 1.

mod cli;
mod commands;
mod error;
mod progress;
mod prompt;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Engine progress and streamed git output arrive as tracing events;
    // default to info so they reach the terminal, debug when verbose.
    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(cli.verbose)
        .init();

    let cwd = std::env::current_dir()?;

    match cli.command {
        Some(Commands::Update { yes }) => commands::run_update(&cwd, yes, cli.verbose).await,
        Some(Commands::Status) => commands::run_status(&cwd, cli.verbose).await,
        Some(Commands::Init {
            repository,
            url,
            branch,
            yes,
        }) => commands::run_init(&cwd, &repository, url, &branch, yes, cli.verbose).await,
        None => {
            println!("{} keep a scaffolded project in sync with its kit", "kitsync".green().bold());
            println!();
            println!("Run {} for available commands.", "kitsync --help".cyan());
            Ok(())
        }
    }
}
