//! multi-repo-sync CLI

mod cli;

use anstream::eprintln;
use clap::Parser;
use cli::SuspendingWriter;
use cli::style::Stylize;
use indicatif::MultiProgress;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Promote a branch across many GitHub repositories: open a pull request,
/// merge it, and optionally cut a release from the merge commit.
#[derive(Debug, Parser)]
#[command(name = "multi-repo-sync", version)]
struct Cli {
    /// Path to the JSON (or .toml) configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Release tag to create in every repository after merging
    ///
    /// Also bumps the manifest version before merging and creates a branch
    /// of the same name after the release.
    #[arg(short, long)]
    release: Option<String>,

    /// Only check that the configured branches exist
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool, progress: &MultiProgress) {
    let default_filter = if verbose {
        "multi_repo_sync=debug"
    } else {
        "multi_repo_sync=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer({
            let progress = progress.clone();
            move || SuspendingWriter::new(progress.clone())
        })
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    let progress = MultiProgress::new();
    init_tracing(args.verbose, &progress);

    let options = cli::sync::SyncCommandOptions {
        config: args.config,
        release: args.release,
        dry_run: args.dry_run,
        show_spinners: !args.verbose,
    };

    match cli::sync::run_sync(&options, progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
