//! Merge stage

use super::StageResult;
use crate::error::Error;
use crate::platform::PlatformService;
use crate::types::{MergeResult, PullRequest};
use futures::future::join_all;
use tracing::{info, warn};

/// Merge the pull request opened for one repository
///
/// Carries the PR stage's failure forward untouched. Merge failures
/// (conflicts, branch protection) are terminal for the repository.
pub async fn merge_pull_request(
    platform: &dyn PlatformService,
    pr: &StageResult<PullRequest>,
) -> StageResult<MergeResult> {
    let (repo, pr) = match pr.proceed() {
        Ok(created) => created,
        Err(failed) => return failed,
    };

    match platform.merge_pr(repo, pr.number).await {
        Ok(result) if result.merged => {
            info!("Merged PR {} on repo {}", pr.number, repo.repo);
            StageResult::success(repo.clone(), result)
        }
        Ok(result) => {
            let message = result
                .message
                .unwrap_or_else(|| "merge was not performed".to_string());
            warn!(%repo, pr_number = pr.number, %message, "merge not performed");
            StageResult::failed(
                repo.clone(),
                Error::NotMerged {
                    pr_number: pr.number,
                    message,
                },
            )
        }
        Err(e) => {
            warn!(%repo, pr_number = pr.number, error = %e, "merge failed");
            StageResult::failed(repo.clone(), e)
        }
    }
}

/// Second phase: merge every created pull request
pub async fn merge_pull_requests(
    platform: &dyn PlatformService,
    pull_requests: &[StageResult<PullRequest>],
) -> Vec<StageResult<MergeResult>> {
    join_all(
        pull_requests
            .iter()
            .map(|pr| merge_pull_request(platform, pr)),
    )
    .await
}
