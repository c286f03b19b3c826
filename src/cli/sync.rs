//! Sync command - run the pipeline over every configured repository

use crate::cli::CliProgress;
use crate::cli::report::{branches_table, render_report};
use crate::cli::style::Stylize;
use anstream::println;
use indicatif::MultiProgress;
use multi_repo_sync::config::{load_config, resolve_config_path};
use multi_repo_sync::error::Result;
use multi_repo_sync::pipeline::{
    ProgressCallback, Stage, SyncOptions, check_branches, run_sync as run_pipeline,
};
use multi_repo_sync::platform::create_platform_service;
use std::path::PathBuf;

/// Options for the sync command
#[derive(Debug, Clone, Default)]
pub struct SyncCommandOptions {
    /// Config file override
    pub config: Option<PathBuf>,
    /// Release tag; `None` skips the release stage
    pub release: Option<String>,
    /// Only check branches
    pub dry_run: bool,
    /// Show phase spinners
    pub show_spinners: bool,
}

/// Run the sync command
///
/// `progress` is the draw target shared with the log writer.
pub async fn run_sync(options: &SyncCommandOptions, progress: MultiProgress) -> Result<()> {
    let path = resolve_config_path(options.config.as_deref());
    println!(
        "{}",
        format!("Reading config from {}", path.display()).muted()
    );
    let config = load_config(&path)?;

    if config.repositories.is_empty() {
        println!("{}", "No repositories configured.".muted());
        return Ok(());
    }

    let platform = create_platform_service(&config).await?;
    let progress = CliProgress::new(progress, options.show_spinners);

    if options.dry_run {
        let count = config.repositories.len();
        progress.on_phase_start(Stage::BranchCheck, count).await;
        let branches = check_branches(platform.as_ref(), &config.repositories).await;
        let succeeded = branches.iter().filter(|b| b.is_success()).count();
        progress
            .on_phase_complete(Stage::BranchCheck, succeeded, count - succeeded)
            .await;

        println!();
        println!("{}", branches_table(&branches));
        println!("{}", "Dry run complete, nothing was changed.".muted());
        return Ok(());
    }

    let sync_options = SyncOptions {
        release_name: options.release.clone(),
    };
    let report = run_pipeline(platform.as_ref(), &config, &sync_options, &progress).await;

    println!();
    println!("{}", render_report(&report));
    Ok(())
}
