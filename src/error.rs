//! Error types for multi-repo-sync

use crate::types::{BranchRole, RepoId};
use thiserror::Error;

/// HTTP status GitHub uses for requests it understood but refused to process
const UNPROCESSABLE_ENTITY: u16 = 422;

/// Errors produced by the pipeline, the platform layer and the CLI setup
///
/// Payloads are plain strings so a failure record can be copied into every
/// downstream stage of the same repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// A configured branch does not exist on the remote
    #[error("Could not find {role} branch for repo: {repo}, branch: {branch}")]
    BranchNotFound {
        /// Repository that was searched
        repo: RepoId,
        /// Which of the two configured branches is missing
        role: BranchRole,
        /// The branch name that was looked up
        branch: String,
    },

    /// One item of a validation failure, attributed to its repository
    #[error("{message} on repo {repo}")]
    Validation {
        /// Repository name
        repo: String,
        /// Message reported by the forge for this item
        message: String,
    },

    /// The forge refused a mutating request as unprocessable (HTTP 422)
    ///
    /// Carries one message per structured error item in the response.
    #[error("Validation failed: {}", .0.join("; "))]
    Unprocessable(Vec<String>),

    /// Any other GitHub API failure (network, auth, unexpected status)
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// The forge answered a merge request without merging
    #[error("PR #{pr_number} was not merged: {message}")]
    NotMerged {
        /// PR that was being merged
        pr_number: u64,
        /// Message from the forge
        message: String,
    },

    /// A merge succeeded but no commit SHA came back to tag a release at
    #[error("Merge of PR #{pr_number} returned no commit SHA to release from")]
    MissingMergeSha {
        /// PR that was merged
        pr_number: u64,
    },

    /// A version manifest could not be rewritten
    #[error("Cannot bump version in {path}: {message}")]
    Manifest {
        /// Manifest path from the repository root
        path: String,
        /// What went wrong
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No usable credential, or the forge rejected it
    #[error("Authentication error: {0}")]
    Auth(String),
}

/// Result alias using the crate error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        if let octocrab::Error::GitHub { source, .. } = &err
            && source.status_code.as_u16() == UNPROCESSABLE_ENTITY
        {
            let items: Vec<String> = source
                .errors
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(describe_error_item)
                .collect();
            if items.is_empty() {
                return Self::Unprocessable(vec![source.message.clone()]);
            }
            return Self::Unprocessable(items);
        }
        Self::GitHubApi(err.to_string())
    }
}

/// Render one entry of GitHub's `errors` array
///
/// Entries usually carry a `message`; field validation errors only carry
/// `resource`, `field` and `code`.
pub(crate) fn describe_error_item(item: &serde_json::Value) -> String {
    if let Some(message) = item.get("message").and_then(serde_json::Value::as_str) {
        return message.to_string();
    }
    if let Some(text) = item.as_str() {
        return text.to_string();
    }

    let field = |key: &str| item.get(key).and_then(serde_json::Value::as_str);
    match (field("resource"), field("field"), field("code")) {
        (Some(resource), Some(name), Some(code)) => format!("{resource}.{name} is {code}"),
        (_, Some(name), Some(code)) => format!("{name} is {code}"),
        (_, _, Some(code)) => code.to_string(),
        _ => item.to_string(),
    }
}
