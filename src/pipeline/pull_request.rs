//! Pull request stage

use super::{StageResult, guard_branches};
use crate::config::{Pattern, RepositoryTarget};
use crate::error::Error;
use crate::platform::PlatformService;
use crate::types::{BranchPair, PullRequest};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Open the pull request for one guarded repository
///
/// Short-circuits with the guard's errors when a branch is missing. A
/// validation failure from the forge becomes one error per reported item,
/// each naming the repository; any other failure is kept as a single error.
pub async fn create_pull_request(
    platform: &dyn PlatformService,
    target: &RepositoryTarget,
    branches: &StageResult<BranchPair>,
    pattern: &Pattern,
) -> StageResult<PullRequest> {
    let (repo, pair) = match branches.proceed() {
        Ok(guarded) => guarded,
        Err(failed) => return failed,
    };

    let created = platform
        .create_pr(
            repo,
            &pair.head.name,
            &pair.base.name,
            &pattern.title,
            &pattern.body,
        )
        .await;

    match created {
        Ok(pr) => {
            info!(
                "Created PR {} on repo {} : {} TO {}",
                pr.number, target.repo, pair.head.name, pair.base.name
            );
            StageResult::success(repo.clone(), pr)
        }
        Err(Error::Unprocessable(messages)) => {
            warn!(%repo, count = messages.len(), "pull request rejected by validation");
            let errors = messages
                .into_iter()
                .map(|message| Error::Validation {
                    repo: target.repo.clone(),
                    message,
                })
                .collect();
            StageResult::failure(repo.clone(), errors)
        }
        Err(e) => {
            warn!(%repo, error = %e, "pull request creation failed");
            StageResult::failed(repo.clone(), e)
        }
    }
}

/// Wait, guard and open the PR for one repository
async fn prepare_repository(
    platform: &dyn PlatformService,
    target: &RepositoryTarget,
    pattern: &Pattern,
) -> (StageResult<BranchPair>, StageResult<PullRequest>) {
    if let Some(wait) = target.wait() {
        debug!(repo = %target.id(), ?wait, "waiting before starting");
        tokio::time::sleep(wait).await;
    }

    let branches = guard_branches(platform, target).await;
    let pr = create_pull_request(platform, target, &branches, pattern).await;
    (branches, pr)
}

/// First phase: open a pull request in every repository
///
/// Returns the branch check and PR results, both in input order. There is
/// no barrier between the check and the creation of one repository, so the
/// per-repository waits keep mutating calls staggered.
pub async fn open_pull_requests(
    platform: &dyn PlatformService,
    targets: &[RepositoryTarget],
    pattern: &Pattern,
) -> (Vec<StageResult<BranchPair>>, Vec<StageResult<PullRequest>>) {
    join_all(
        targets
            .iter()
            .map(|target| prepare_repository(platform, target, pattern)),
    )
    .await
    .into_iter()
    .unzip()
}
