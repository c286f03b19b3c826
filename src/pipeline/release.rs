//! Release stage

use super::StageResult;
use crate::error::Error;
use crate::platform::PlatformService;
use crate::types::{MergeResult, Release};
use futures::future::join_all;
use tracing::{info, warn};

/// Cut a release at the merge commit of one repository
pub async fn create_release(
    platform: &dyn PlatformService,
    merge: &StageResult<MergeResult>,
    tag_name: &str,
) -> StageResult<Release> {
    let (repo, merge) = match merge.proceed() {
        Ok(merged) => merged,
        Err(failed) => return failed,
    };

    let Some(sha) = merge.sha.as_deref() else {
        warn!(%repo, pr_number = merge.pr_number, "merge returned no sha");
        return StageResult::failed(
            repo.clone(),
            Error::MissingMergeSha {
                pr_number: merge.pr_number,
            },
        );
    };

    match platform.create_release(repo, tag_name, sha).await {
        Ok(release) => {
            info!("Released {} on repo {} at {}", tag_name, repo.repo, sha);
            StageResult::success(repo.clone(), release)
        }
        Err(e) => {
            warn!(%repo, tag_name, error = %e, "release failed");
            StageResult::failed(repo.clone(), e)
        }
    }
}

/// Third phase: release every merged repository
///
/// Returns `None` without touching the forge when no release name was given
/// for the run.
pub async fn create_releases(
    platform: &dyn PlatformService,
    merges: &[StageResult<MergeResult>],
    release_name: Option<&str>,
) -> Option<Vec<StageResult<Release>>> {
    let tag_name = release_name?;
    Some(
        join_all(
            merges
                .iter()
                .map(|merge| create_release(platform, merge, tag_name)),
        )
        .await,
    )
}
