//! Branch guard - confirm both configured branches exist on the remote

use super::StageResult;
use crate::config::RepositoryTarget;
use crate::error::Error;
use crate::platform::{BRANCHES_PER_PAGE, PlatformService};
use crate::types::{Branch, BranchPair, BranchRole};
use futures::future::join_all;
use tracing::{debug, warn};

/// Look up the `origin` and `target` branches of one repository
///
/// Pages through the branch listing until both names are found or a short
/// page marks the end. Every missing branch yields its own error. A failed
/// listing call fails the repository with that error; it is not retried.
pub async fn guard_branches(
    platform: &dyn PlatformService,
    target: &RepositoryTarget,
) -> StageResult<BranchPair> {
    let repo = target.id();
    let mut head: Option<Branch> = None;
    let mut base: Option<Branch> = None;
    let mut page = 1;

    loop {
        let branches = match platform.list_branches(&repo, page, BRANCHES_PER_PAGE).await {
            Ok(branches) => branches,
            Err(e) => {
                warn!(%repo, page, error = %e, "branch listing failed");
                return StageResult::failed(repo, e);
            }
        };

        if head.is_none() {
            head = branches.iter().find(|b| b.name == target.origin).cloned();
        }
        if base.is_none() {
            base = branches.iter().find(|b| b.name == target.target).cloned();
        }

        if head.is_some() && base.is_some() {
            break;
        }
        if branches.len() < usize::from(BRANCHES_PER_PAGE) {
            break;
        }
        page += 1;
    }

    match (head, base) {
        (Some(head), Some(base)) => {
            debug!(%repo, pages = page, "both branches found");
            StageResult::success(repo, BranchPair { base, head })
        }
        (head, base) => {
            let mut errors = Vec::new();
            if head.is_none() {
                errors.push(Error::BranchNotFound {
                    repo: repo.clone(),
                    role: BranchRole::Origin,
                    branch: target.origin.clone(),
                });
            }
            if base.is_none() {
                errors.push(Error::BranchNotFound {
                    repo: repo.clone(),
                    role: BranchRole::Target,
                    branch: target.target.clone(),
                });
            }
            warn!(%repo, missing = errors.len(), "branch check failed");
            StageResult::failure(repo, errors)
        }
    }
}

/// Run only the branch guard for every repository
///
/// Used for dry runs: no pre-flight waits, nothing is mutated.
pub async fn check_branches(
    platform: &dyn PlatformService,
    targets: &[RepositoryTarget],
) -> Vec<StageResult<BranchPair>> {
    join_all(targets.iter().map(|t| guard_branches(platform, t))).await
}
