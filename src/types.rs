//! Core types for multi-repo-sync

use serde::Deserialize;

/// Identity of a remote repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl RepoId {
    /// Create a repository identity
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Which of the two configured branches a lookup refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRole {
    /// Branch merged from (PR head)
    Origin,
    /// Branch merged into (PR base)
    Target,
}

impl std::fmt::Display for BranchRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Origin => write!(f, "origin"),
            Self::Target => write!(f, "target"),
        }
    }
}

/// A remote branch as listed by the forge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name
    pub name: String,
    /// SHA of the latest commit
    pub commit_sha: String,
}

/// Both branches of a repository, confirmed to exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPair {
    /// The `target` branch (PR base)
    pub base: Branch,
    /// The `origin` branch (PR head)
    pub head: Branch,
}

/// A pull request created by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// Head commit when the PR was opened
    pub head_sha: String,
}

/// Result of a merge operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// PR that was merged
    pub pr_number: u64,
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation
    pub message: Option<String>,
}

/// A release created from a merge commit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Release ID
    pub id: u64,
    /// Tag the release points at
    pub tag_name: String,
    /// Web URL for the release
    pub html_url: String,
}

/// A file read from a branch, decoded to text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    /// Path from the repository root
    pub path: String,
    /// Blob SHA, required to update the file
    pub sha: String,
    /// Decoded file content
    pub content: String,
}

/// Outcome of bumping the manifest version on the origin branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBump {
    /// Manifest that was rewritten, `None` when the repository has none
    pub file: Option<String>,
    /// Origin head after the bump: the bump commit, or the PR head if nothing changed
    pub head_sha: String,
}
