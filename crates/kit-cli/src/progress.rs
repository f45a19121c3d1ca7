//! Console rendering of engine progress events

use std::sync::Mutex;

use colored::Colorize;

use kit_engine::{Phase, ProgressEvent, ProgressObserver};

/// Prints one heading per phase, plus per-file details in verbose mode.
pub struct ConsoleProgress {
    verbose: bool,
    last_phase: Mutex<Option<Phase>>,
}

impl ConsoleProgress {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            last_phase: Mutex::new(None),
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_event(&self, event: &ProgressEvent) {
        if let Ok(mut last) = self.last_phase.lock()
            && *last != Some(event.phase)
        {
            println!("{} {}", "=>".blue().bold(), event.phase.describe());
            *last = Some(event.phase);
        }

        if self.verbose
            && let Some(detail) = &event.detail
        {
            println!("   {}", detail.as_str().dimmed());
        }
    }
}
