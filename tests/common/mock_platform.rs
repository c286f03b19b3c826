//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use multi_repo_sync::error::{Error, Result};
use multi_repo_sync::platform::PlatformService;
use multi_repo_sync::types::{Branch, MergeResult, PullRequest, Release, RepoFile, RepoId};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Call record for `list_branches`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBranchesCall {
    pub repo: RepoId,
    pub page: u32,
    pub per_page: u8,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub repo: RepoId,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub repo: RepoId,
    pub pr_number: u64,
}

/// Call record for `create_release`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReleaseCall {
    pub repo: RepoId,
    pub tag_name: String,
    pub target_commitish: String,
}

/// Call record for `update_file`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateFileCall {
    pub repo: RepoId,
    pub path: String,
    pub message: String,
    pub content: String,
    pub sha: String,
    pub branch: String,
}

/// Call record for `create_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBranchCall {
    pub repo: RepoId,
    pub name: String,
    pub sha: String,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Per-repository branch listings, paged like the real API
/// - Auto-incrementing PR numbers, overridable per repository
/// - Call tracking for verification, plus an ordered event log
/// - Error injection per repository and operation
/// - Artificial latency on PR creation
pub struct MockPlatformService {
    next_pr_number: AtomicU64,
    branches: Mutex<HashMap<RepoId, Vec<Branch>>>,
    pr_numbers: Mutex<HashMap<RepoId, u64>>,
    merge_shas: Mutex<HashMap<RepoId, Option<String>>>,
    create_pr_delays: Mutex<HashMap<RepoId, Duration>>,
    files: Mutex<HashMap<(RepoId, String), RepoFile>>,
    // Call tracking
    list_branches_calls: Mutex<Vec<ListBranchesCall>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    create_release_calls: Mutex<Vec<CreateReleaseCall>>,
    update_file_calls: Mutex<Vec<UpdateFileCall>>,
    create_branch_calls: Mutex<Vec<CreateBranchCall>>,
    events: Mutex<Vec<String>>,
    // Error injection
    error_on_list_branches: Mutex<HashMap<RepoId, Error>>,
    error_on_create_pr: Mutex<HashMap<RepoId, Error>>,
    error_on_merge_pr: Mutex<HashMap<RepoId, Error>>,
    error_on_create_release: Mutex<HashMap<RepoId, Error>>,
    error_on_update_file: Mutex<HashMap<RepoId, Error>>,
    error_on_create_branch: Mutex<HashMap<RepoId, Error>>,
    not_merged: Mutex<HashMap<RepoId, String>>,
}

impl Default for MockPlatformService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatformService {
    /// Create an empty mock: no repositories have branches yet
    pub fn new() -> Self {
        Self {
            next_pr_number: AtomicU64::new(1),
            branches: Mutex::new(HashMap::new()),
            pr_numbers: Mutex::new(HashMap::new()),
            merge_shas: Mutex::new(HashMap::new()),
            create_pr_delays: Mutex::new(HashMap::new()),
            files: Mutex::new(HashMap::new()),
            list_branches_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            merge_pr_calls: Mutex::new(Vec::new()),
            create_release_calls: Mutex::new(Vec::new()),
            update_file_calls: Mutex::new(Vec::new()),
            create_branch_calls: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            error_on_list_branches: Mutex::new(HashMap::new()),
            error_on_create_pr: Mutex::new(HashMap::new()),
            error_on_merge_pr: Mutex::new(HashMap::new()),
            error_on_create_release: Mutex::new(HashMap::new()),
            error_on_update_file: Mutex::new(HashMap::new()),
            error_on_create_branch: Mutex::new(HashMap::new()),
            not_merged: Mutex::new(HashMap::new()),
        }
    }

    // === Setup methods ===

    /// Set the branches a repository has, in listing order
    pub fn set_branches(&self, repo: &RepoId, names: &[&str]) {
        let branches = names
            .iter()
            .map(|name| Branch {
                name: (*name).to_string(),
                commit_sha: format!("sha-{name}"),
            })
            .collect();
        self.branches.lock().unwrap().insert(repo.clone(), branches);
    }

    /// Give a repository `filler` generated branches with `names` appended after them
    pub fn set_many_branches(&self, repo: &RepoId, filler: usize, names: &[&str]) {
        let branches = (0..filler)
            .map(|i| format!("feature-{i:04}"))
            .chain(names.iter().map(|n| (*n).to_string()))
            .map(|name| Branch {
                commit_sha: format!("sha-{name}"),
                name,
            })
            .collect();
        self.branches.lock().unwrap().insert(repo.clone(), branches);
    }

    /// Fix the PR number returned for a repository
    pub fn set_pr_number(&self, repo: &RepoId, number: u64) {
        self.pr_numbers.lock().unwrap().insert(repo.clone(), number);
    }

    /// Fix the merge commit SHA returned for a repository (`None` for no SHA)
    pub fn set_merge_sha(&self, repo: &RepoId, sha: Option<&str>) {
        self.merge_shas
            .lock()
            .unwrap()
            .insert(repo.clone(), sha.map(ToString::to_string));
    }

    /// Make PR creation for a repository take `delay`
    pub fn delay_create_pr(&self, repo: &RepoId, delay: Duration) {
        self.create_pr_delays
            .lock()
            .unwrap()
            .insert(repo.clone(), delay);
    }

    /// Put a file at the repository root (any branch)
    pub fn set_file(&self, repo: &RepoId, path: &str, content: &str) {
        self.files.lock().unwrap().insert(
            (repo.clone(), path.to_string()),
            RepoFile {
                path: path.to_string(),
                sha: format!("blob-{path}"),
                content: content.to_string(),
            },
        );
    }

    // === Error injection methods ===

    /// Make `list_branches` fail for a repository
    pub fn fail_list_branches(&self, repo: &RepoId, error: Error) {
        self.error_on_list_branches
            .lock()
            .unwrap()
            .insert(repo.clone(), error);
    }

    /// Make `create_pr` fail for a repository
    pub fn fail_create_pr(&self, repo: &RepoId, error: Error) {
        self.error_on_create_pr
            .lock()
            .unwrap()
            .insert(repo.clone(), error);
    }

    /// Make `merge_pr` fail for a repository
    pub fn fail_merge_pr(&self, repo: &RepoId, error: Error) {
        self.error_on_merge_pr
            .lock()
            .unwrap()
            .insert(repo.clone(), error);
    }

    /// Make `merge_pr` answer without merging
    pub fn refuse_merge(&self, repo: &RepoId, message: &str) {
        self.not_merged
            .lock()
            .unwrap()
            .insert(repo.clone(), message.to_string());
    }

    /// Make `create_release` fail for a repository
    pub fn fail_create_release(&self, repo: &RepoId, error: Error) {
        self.error_on_create_release
            .lock()
            .unwrap()
            .insert(repo.clone(), error);
    }

    /// Make `update_file` fail for a repository
    pub fn fail_update_file(&self, repo: &RepoId, error: Error) {
        self.error_on_update_file
            .lock()
            .unwrap()
            .insert(repo.clone(), error);
    }

    /// Make `create_branch` fail for a repository
    pub fn fail_create_branch(&self, repo: &RepoId, error: Error) {
        self.error_on_create_branch
            .lock()
            .unwrap()
            .insert(repo.clone(), error);
    }

    // === Call verification methods ===

    /// Get all `list_branches` calls
    pub fn get_list_branches_calls(&self) -> Vec<ListBranchesCall> {
        self.list_branches_calls.lock().unwrap().clone()
    }

    /// Get all `create_pr` calls
    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    /// Get all `merge_pr` calls
    pub fn get_merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }

    /// Get all `create_release` calls
    pub fn get_create_release_calls(&self) -> Vec<CreateReleaseCall> {
        self.create_release_calls.lock().unwrap().clone()
    }

    /// Get all `update_file` calls
    pub fn get_update_file_calls(&self) -> Vec<UpdateFileCall> {
        self.update_file_calls.lock().unwrap().clone()
    }

    /// Get all `create_branch` calls
    pub fn get_create_branch_calls(&self) -> Vec<CreateBranchCall> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    /// Ordered log of call starts and ends, e.g. `create_pr:end:o/r`
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Position of an event in the log
    pub fn event_index(&self, event: &str) -> usize {
        let events = self.events();
        events
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("Expected event {event} but got: {events:?}"))
    }

    /// Count of calls of any mutating kind for a repository
    pub fn mutating_calls_for(&self, repo: &RepoId) -> usize {
        self.get_create_pr_calls()
            .iter()
            .filter(|c| &c.repo == repo)
            .count()
            + self
                .get_merge_pr_calls()
                .iter()
                .filter(|c| &c.repo == repo)
                .count()
            + self
                .get_create_release_calls()
                .iter()
                .filter(|c| &c.repo == repo)
                .count()
            + self
                .get_update_file_calls()
                .iter()
                .filter(|c| &c.repo == repo)
                .count()
            + self
                .get_create_branch_calls()
                .iter()
                .filter(|c| &c.repo == repo)
                .count()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, repo: &RepoId, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls
                .iter()
                .any(|c| &c.repo == repo && c.head == head && c.base == base),
            "Expected create_pr({repo}, {head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_pr` was NOT called for a repository
    pub fn assert_merge_not_called(&self, repo: &RepoId) {
        let calls = self.get_merge_pr_calls();
        assert!(
            !calls.iter().any(|c| &c.repo == repo),
            "Expected merge_pr({repo}) NOT to be called but it was: {calls:?}"
        );
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn injected(map: &Mutex<HashMap<RepoId, Error>>, repo: &RepoId) -> Option<Error> {
        map.lock().unwrap().get(repo).cloned()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn current_user(&self) -> Result<String> {
        Ok("mock-user".to_string())
    }

    async fn list_branches(&self, repo: &RepoId, page: u32, per_page: u8) -> Result<Vec<Branch>> {
        self.list_branches_calls
            .lock()
            .unwrap()
            .push(ListBranchesCall {
                repo: repo.clone(),
                page,
                per_page,
            });
        self.record(format!("list_branches:{page}:{repo}"));

        if let Some(error) = Self::injected(&self.error_on_list_branches, repo) {
            return Err(error);
        }

        let per_page = usize::from(per_page);
        let skip = (page.max(1) as usize - 1) * per_page;
        let branches = self.branches.lock().unwrap();
        Ok(branches
            .get(repo)
            .map(|all| all.iter().skip(skip).take(per_page).cloned().collect())
            .unwrap_or_default())
    }

    async fn create_pr(
        &self,
        repo: &RepoId,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            repo: repo.clone(),
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        self.record(format!("create_pr:start:{repo}"));

        let delay = self.create_pr_delays.lock().unwrap().get(repo).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(format!("create_pr:end:{repo}"));

        if let Some(error) = Self::injected(&self.error_on_create_pr, repo) {
            return Err(error);
        }

        let fixed = self.pr_numbers.lock().unwrap().get(repo).copied();
        let number = fixed.unwrap_or_else(|| self.next_pr_number.fetch_add(1, Ordering::SeqCst));
        Ok(PullRequest {
            number,
            title: title.to_string(),
            html_url: format!("https://github.com/{repo}/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            head_sha: format!("sha-{head}"),
        })
    }

    async fn merge_pr(&self, repo: &RepoId, pr_number: u64) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            repo: repo.clone(),
            pr_number,
        });
        self.record(format!("merge:{repo}"));

        if let Some(error) = Self::injected(&self.error_on_merge_pr, repo) {
            return Err(error);
        }

        if let Some(message) = self.not_merged.lock().unwrap().get(repo).cloned() {
            return Ok(MergeResult {
                pr_number,
                merged: false,
                sha: None,
                message: Some(message),
            });
        }

        let sha = self
            .merge_shas
            .lock()
            .unwrap()
            .get(repo)
            .cloned()
            .unwrap_or_else(|| Some(format!("merged_sha_{pr_number}")));
        Ok(MergeResult {
            pr_number,
            merged: true,
            sha,
            message: Some("Pull Request successfully merged".to_string()),
        })
    }

    async fn create_release(
        &self,
        repo: &RepoId,
        tag_name: &str,
        target_commitish: &str,
    ) -> Result<Release> {
        self.create_release_calls
            .lock()
            .unwrap()
            .push(CreateReleaseCall {
                repo: repo.clone(),
                tag_name: tag_name.to_string(),
                target_commitish: target_commitish.to_string(),
            });
        self.record(format!("release:{repo}"));

        if let Some(error) = Self::injected(&self.error_on_create_release, repo) {
            return Err(error);
        }

        Ok(Release {
            id: 1,
            tag_name: tag_name.to_string(),
            html_url: format!("https://github.com/{repo}/releases/tag/{tag_name}"),
        })
    }

    async fn get_file(&self, repo: &RepoId, path: &str, branch: &str) -> Result<Option<RepoFile>> {
        self.record(format!("get_file:{path}:{branch}:{repo}"));
        Ok(self
            .files
            .lock()
            .unwrap()
            .get(&(repo.clone(), path.to_string()))
            .cloned())
    }

    async fn update_file(
        &self,
        repo: &RepoId,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<String> {
        self.update_file_calls.lock().unwrap().push(UpdateFileCall {
            repo: repo.clone(),
            path: path.to_string(),
            message: message.to_string(),
            content: content.to_string(),
            sha: sha.to_string(),
            branch: branch.to_string(),
        });
        self.record(format!("update_file:{repo}"));

        if let Some(error) = Self::injected(&self.error_on_update_file, repo) {
            return Err(error);
        }

        Ok(format!("bump-{}", repo.repo))
    }

    async fn create_branch(&self, repo: &RepoId, name: &str, sha: &str) -> Result<Branch> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push(CreateBranchCall {
                repo: repo.clone(),
                name: name.to_string(),
                sha: sha.to_string(),
            });
        self.record(format!("create_branch:{repo}"));

        if let Some(error) = Self::injected(&self.error_on_create_branch, repo) {
            return Err(error);
        }

        Ok(Branch {
            name: name.to_string(),
            commit_sha: sha.to_string(),
        })
    }
}
