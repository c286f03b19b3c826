//! Version bump and version branch stages
//!
//! Both run only when a release name is given. The bump rewrites the version
//! field of the first manifest found on the origin branch before the merge.
//! The version branch is cut after the release, at the origin head that was
//! merged.

use super::StageResult;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, PullRequest, Release, RepoId, VersionBump};
use futures::future::join_all;
use regex::{Captures, Regex};
use tracing::{debug, info, warn};

/// Commit message of the version bump
pub const BUMP_COMMIT_MESSAGE: &str = "Bumping version";

/// Manifest formats whose version field can be bumped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Manifest {
    /// `package.json` (Node)
    PackageJson,
    /// `pyproject.toml` (Python)
    PyProject,
}

impl Manifest {
    /// Lookup order on the origin branch
    pub const ALL: [Self; 2] = [Self::PackageJson, Self::PyProject];

    /// Path from the repository root
    pub const fn path(self) -> &'static str {
        match self {
            Self::PackageJson => "package.json",
            Self::PyProject => "pyproject.toml",
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            Self::PackageJson => r#"("version"\s*:\s*)"[^"]*""#,
            Self::PyProject => r#"(?m)^(version\s*=\s*)"[^"]*""#,
        }
    }

    /// Rewrite the first version field to `version`
    ///
    /// Returns `None` when the content has no version field. Everything
    /// outside the quoted value is left as it was.
    pub fn bump(self, content: &str, version: &str) -> Result<Option<String>> {
        let re = Regex::new(self.pattern()).map_err(|e| Error::Manifest {
            path: self.path().to_string(),
            message: e.to_string(),
        })?;
        if !re.is_match(content) {
            return Ok(None);
        }
        let bumped = re.replacen(content, 1, |caps: &Captures<'_>| {
            format!("{}\"{version}\"", &caps[1])
        });
        Ok(Some(bumped.into_owned()))
    }
}

async fn apply_bump(
    platform: &dyn PlatformService,
    repo: &RepoId,
    pr: &PullRequest,
    version: &str,
) -> Result<VersionBump> {
    for manifest in Manifest::ALL {
        let Some(file) = platform
            .get_file(repo, manifest.path(), &pr.head_ref)
            .await?
        else {
            continue;
        };

        let Some(content) = manifest.bump(&file.content, version)? else {
            return Err(Error::Manifest {
                path: file.path,
                message: "no version field".to_string(),
            });
        };
        if content == file.content {
            debug!(%repo, path = %file.path, version, "version already set");
            return Ok(VersionBump {
                file: Some(file.path),
                head_sha: pr.head_sha.clone(),
            });
        }

        let commit = platform
            .update_file(
                repo,
                &file.path,
                BUMP_COMMIT_MESSAGE,
                &content,
                &file.sha,
                &pr.head_ref,
            )
            .await?;
        info!("Bumped {} to {} on repo {}", file.path, version, repo.repo);
        return Ok(VersionBump {
            file: Some(file.path),
            head_sha: commit,
        });
    }

    debug!(%repo, "no manifest found, version left alone");
    Ok(VersionBump {
        file: None,
        head_sha: pr.head_sha.clone(),
    })
}

/// Bump the manifest version on the origin branch of one repository
///
/// A repository without a known manifest succeeds without a commit. A
/// manifest without a version field fails the repository.
pub async fn bump_version(
    platform: &dyn PlatformService,
    pr: &StageResult<PullRequest>,
    version: &str,
) -> StageResult<VersionBump> {
    let (repo, pr) = match pr.proceed() {
        Ok(created) => created,
        Err(failed) => return failed,
    };

    match apply_bump(platform, repo, pr, version).await {
        Ok(bump) => StageResult::success(repo.clone(), bump),
        Err(e) => {
            warn!(%repo, version, error = %e, "version bump failed");
            StageResult::failed(repo.clone(), e)
        }
    }
}

/// Bump every repository whose PR was created
pub async fn bump_versions(
    platform: &dyn PlatformService,
    pull_requests: &[StageResult<PullRequest>],
    version: &str,
) -> Vec<StageResult<VersionBump>> {
    join_all(
        pull_requests
            .iter()
            .map(|pr| bump_version(platform, pr, version)),
    )
    .await
}

/// Create the version branch for one released repository
pub async fn create_version_branch(
    platform: &dyn PlatformService,
    release: &StageResult<Release>,
    bump: &StageResult<VersionBump>,
    version: &str,
) -> StageResult<Branch> {
    let repo = match release.proceed::<Branch>() {
        Ok((repo, _)) => repo,
        Err(failed) => return failed,
    };
    let bump = match bump.proceed() {
        Ok((_, bump)) => bump,
        Err(failed) => return failed,
    };

    match platform.create_branch(repo, version, &bump.head_sha).await {
        Ok(branch) => {
            info!("Created branch {} on repo {} at {}", version, repo.repo, bump.head_sha);
            StageResult::success(repo.clone(), branch)
        }
        Err(e) => {
            warn!(%repo, version, error = %e, "version branch failed");
            StageResult::failed(repo.clone(), e)
        }
    }
}

/// Last phase: cut a version branch in every released repository
pub async fn create_version_branches(
    platform: &dyn PlatformService,
    releases: &[StageResult<Release>],
    bumps: &[StageResult<VersionBump>],
    version: &str,
) -> Vec<StageResult<Branch>> {
    join_all(
        releases
            .iter()
            .zip(bumps)
            .map(|(release, bump)| create_version_branch(platform, release, bump, version)),
    )
    .await
}
