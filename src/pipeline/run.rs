//! Pipeline orchestrator
//!
//! Runs the phases in sequence. Each phase takes the whole fleet's results
//! from the previous phase and settles for every repository before the next
//! phase starts.

use super::{
    Outcome, ProgressCallback, RepoState, Stage, StageResult, bump_versions, create_releases,
    create_version_branches, merge_pull_requests, open_pull_requests,
};
use crate::config::Config;
use crate::platform::PlatformService;
use crate::types::{Branch, BranchPair, MergeResult, PullRequest, Release, VersionBump};
use tracing::{debug, info};

/// Options for one sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Release tag to cut after merging; `None` skips the release stage
    ///
    /// Also the version written to the manifests and the name of the
    /// version branch.
    pub release_name: Option<String>,
}

/// Results of every phase, aligned with the configured repository order
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Branch check per repository
    pub branches: Vec<StageResult<BranchPair>>,
    /// PR creation per repository
    pub pull_requests: Vec<StageResult<PullRequest>>,
    /// Version bump per repository, `None` without a release name
    pub version_bumps: Option<Vec<StageResult<VersionBump>>>,
    /// Merge per repository
    pub merges: Vec<StageResult<MergeResult>>,
    /// Release per repository, `None` when the stage was skipped for the run
    pub releases: Option<Vec<StageResult<Release>>>,
    /// Version branch per repository, `None` without a release name
    pub version_branches: Option<Vec<StageResult<Branch>>>,
}

/// Fold an optional follow-up stage into the outcome of the stage it extends
fn combine<T>(outcome: Outcome, follow_up: Option<&StageResult<T>>) -> Outcome {
    match follow_up {
        Some(result) if !result.is_success() => Outcome::Failed,
        _ => outcome,
    }
}

fn failed_at<T>(results: Option<&Vec<StageResult<T>>>, i: usize) -> bool {
    results.is_some_and(|results| !results[i].is_success())
}

impl SyncReport {
    /// Final pipeline state of every repository
    pub fn states(&self) -> Vec<RepoState> {
        (0..self.branches.len())
            .map(|i| {
                let pr = combine(
                    Outcome::from(&self.pull_requests[i]),
                    self.version_bumps.as_ref().map(|bumps| &bumps[i]),
                );
                let release = self
                    .releases
                    .as_ref()
                    .map_or(Outcome::Skipped, |releases| Outcome::from(&releases[i]));
                let release = combine(
                    release,
                    self.version_branches.as_ref().map(|branches| &branches[i]),
                );
                RepoState::Pending
                    .advance(Outcome::from(&self.branches[i]))
                    .advance(pr)
                    .advance(Outcome::from(&self.merges[i]))
                    .advance(release)
            })
            .collect()
    }

    /// Number of repositories that went through every stage that ran
    pub fn succeeded(&self) -> usize {
        self.states().iter().filter(|s| !s.is_failed()).count()
    }

    /// Number of repositories that failed at some stage
    pub fn failed(&self) -> usize {
        self.states().iter().filter(|s| s.is_failed()).count()
    }

    /// The first stage each repository failed at, if any
    pub fn failed_stages(&self) -> Vec<Option<Stage>> {
        (0..self.branches.len())
            .map(|i| {
                if !self.branches[i].is_success() {
                    Some(Stage::BranchCheck)
                } else if !self.pull_requests[i].is_success() {
                    Some(Stage::PullRequest)
                } else if failed_at(self.version_bumps.as_ref(), i) {
                    Some(Stage::VersionBump)
                } else if !self.merges[i].is_success() {
                    Some(Stage::Merge)
                } else if failed_at(self.releases.as_ref(), i) {
                    Some(Stage::Release)
                } else if failed_at(self.version_branches.as_ref(), i) {
                    Some(Stage::VersionBranch)
                } else {
                    None
                }
            })
            .collect()
    }
}

fn tally<T>(results: &[StageResult<T>]) -> (usize, usize) {
    let succeeded = results.iter().filter(|r| r.is_success()).count();
    (succeeded, results.len() - succeeded)
}

/// PRs that may be merged: a failed version bump stops its repository
fn ready_to_merge(
    pull_requests: &[StageResult<PullRequest>],
    bumps: Option<&[StageResult<VersionBump>]>,
) -> Vec<StageResult<PullRequest>> {
    let Some(bumps) = bumps else {
        return pull_requests.to_vec();
    };
    pull_requests
        .iter()
        .zip(bumps)
        .map(|(pr, bump)| match bump.proceed::<PullRequest>() {
            Ok(_) => pr.clone(),
            Err(failed) => failed,
        })
        .collect()
}

/// Run the full pipeline across every configured repository
///
/// Never fails as a whole: per-repository failures are recorded in the
/// report and the remaining repositories carry on.
pub async fn run_sync(
    platform: &dyn PlatformService,
    config: &Config,
    options: &SyncOptions,
    progress: &dyn ProgressCallback,
) -> SyncReport {
    let count = config.repositories.len();
    let release_name = options.release_name.as_deref();
    info!(repositories = count, release = ?release_name, "starting sync");

    progress.on_phase_start(Stage::PullRequest, count).await;
    let (branches, pull_requests) =
        open_pull_requests(platform, &config.repositories, &config.pattern).await;
    let (ok, failed) = tally(&pull_requests);
    progress.on_phase_complete(Stage::PullRequest, ok, failed).await;

    let version_bumps = if let Some(version) = release_name {
        progress.on_phase_start(Stage::VersionBump, count).await;
        let bumps = bump_versions(platform, &pull_requests, version).await;
        let (ok, failed) = tally(&bumps);
        progress.on_phase_complete(Stage::VersionBump, ok, failed).await;
        Some(bumps)
    } else {
        None
    };

    progress.on_phase_start(Stage::Merge, count).await;
    let mergeable = ready_to_merge(&pull_requests, version_bumps.as_deref());
    let merges = merge_pull_requests(platform, &mergeable).await;
    let (ok, failed) = tally(&merges);
    progress.on_phase_complete(Stage::Merge, ok, failed).await;

    let releases = if release_name.is_some() {
        progress.on_phase_start(Stage::Release, count).await;
        let releases = create_releases(platform, &merges, release_name).await;
        if let Some(results) = &releases {
            let (ok, failed) = tally(results);
            progress.on_phase_complete(Stage::Release, ok, failed).await;
        }
        releases
    } else {
        debug!("no release name given, skipping release stage");
        None
    };

    let version_branches = match (release_name, &releases, &version_bumps) {
        (Some(version), Some(releases), Some(bumps)) => {
            progress.on_phase_start(Stage::VersionBranch, count).await;
            let branches = create_version_branches(platform, releases, bumps, version).await;
            let (ok, failed) = tally(&branches);
            progress.on_phase_complete(Stage::VersionBranch, ok, failed).await;
            Some(branches)
        }
        _ => None,
    };

    let report = SyncReport {
        branches,
        pull_requests,
        version_bumps,
        merges,
        releases,
        version_branches,
    };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "sync finished"
    );
    report
}
