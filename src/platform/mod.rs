//! Platform services for GitHub
//!
//! Every forge call the pipeline makes goes through [`PlatformService`], so
//! the stages can be driven against a fake forge in tests.

mod factory;
mod github;

pub use factory::create_platform_service;
pub use github::GitHubService;

use crate::error::Result;
use crate::types::{Branch, MergeResult, PullRequest, Release, RepoFile, RepoId};
use async_trait::async_trait;

/// Page size used when listing branches
pub const BRANCHES_PER_PAGE: u8 = 100;

/// Platform service trait for the forge operations the pipeline needs
///
/// One service instance is shared read-only by every repository's pipeline,
/// so all methods take the repository explicitly.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Login of the authenticated user
    async fn current_user(&self) -> Result<String>;

    /// List one page of branches (pages start at 1)
    async fn list_branches(&self, repo: &RepoId, page: u32, per_page: u8) -> Result<Vec<Branch>>;

    /// Open a pull request from `head` into `base`
    ///
    /// A request the forge refuses as unprocessable fails with
    /// [`Error::Unprocessable`](crate::error::Error::Unprocessable), carrying
    /// one message per reported problem.
    async fn create_pr(
        &self,
        repo: &RepoId,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// Merge a pull request
    async fn merge_pr(&self, repo: &RepoId, pr_number: u64) -> Result<MergeResult>;

    /// Create a release tagged `tag_name` at `target_commitish`
    ///
    /// Release notes are generated by the forge and the release is marked as
    /// the latest one.
    async fn create_release(
        &self,
        repo: &RepoId,
        tag_name: &str,
        target_commitish: &str,
    ) -> Result<Release>;

    /// Read a file from `branch`, `None` when it does not exist
    async fn get_file(&self, repo: &RepoId, path: &str, branch: &str) -> Result<Option<RepoFile>>;

    /// Commit new content for an existing file on `branch`
    ///
    /// `sha` is the blob being replaced. Returns the new commit SHA.
    async fn update_file(
        &self,
        repo: &RepoId,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<String>;

    /// Create branch `name` pointing at `sha`
    async fn create_branch(&self, repo: &RepoId, name: &str, sha: &str) -> Result<Branch>;
}
