//! CLI command implementations

pub mod report;
pub mod style;
pub mod sync;

use anstream::eprintln;
use async_trait::async_trait;
use indicatif::{MultiProgress, ProgressBar};
use multi_repo_sync::pipeline::{ProgressCallback, Stage};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Duration;
use style::{Stylize, check, cross, spinner_style};

/// Log sink that hides live spinners while a line is written to stderr
#[derive(Clone)]
pub struct SuspendingWriter {
    progress: MultiProgress,
}

impl SuspendingWriter {
    /// Writer sharing the spinners' draw target
    pub const fn new(progress: MultiProgress) -> Self {
        Self { progress }
    }
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.progress.suspend(|| io::stderr().flush())
    }
}

/// Spinner-based progress for pipeline phases
pub struct CliProgress {
    progress: MultiProgress,
    spinner: Mutex<Option<ProgressBar>>,
    show_spinners: bool,
}

impl CliProgress {
    /// Create progress output drawing into `progress`
    ///
    /// Log lines must go through a [`SuspendingWriter`] on the same
    /// `MultiProgress` so they do not tear the spinner.
    pub const fn new(progress: MultiProgress, show_spinners: bool) -> Self {
        Self {
            progress,
            spinner: Mutex::new(None),
            show_spinners,
        }
    }
}

fn phase_label(stage: Stage) -> &'static str {
    match stage {
        Stage::BranchCheck => "Checking branches",
        Stage::PullRequest => "Opening pull requests",
        Stage::VersionBump => "Bumping versions",
        Stage::Merge => "Merging pull requests",
        Stage::Release => "Creating releases",
        Stage::VersionBranch => "Creating version branches",
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase_start(&self, stage: Stage, repositories: usize) {
        if !self.show_spinners {
            return;
        }
        let spinner = self.progress.add(ProgressBar::new_spinner());
        spinner.set_style(spinner_style());
        spinner.set_message(format!(
            "{} in {} repositories...",
            phase_label(stage),
            repositories.accent()
        ));
        spinner.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(spinner);
        }
    }

    async fn on_phase_complete(&self, stage: Stage, succeeded: usize, failed: usize) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(spinner) = slot.take()
        {
            spinner.finish_and_clear();
            self.progress.remove(&spinner);
        }
        let mark = if failed == 0 { check() } else { cross() };
        eprintln!(
            "{mark} {}: {} succeeded, {} failed",
            phase_label(stage),
            succeeded.success(),
            if failed == 0 {
                failed.muted()
            } else {
                failed.error()
            }
        );
    }
}
