//! Run configuration
//!
//! The configuration is read once at process start and passed by reference
//! to the pipeline. It is never mutated afterwards.

mod storage;

pub use storage::{CONFIG_FILE, default_config_path, load_config, resolve_config_path};

use crate::error::{Error, Result};
use crate::types::RepoId;
use serde::Deserialize;
use std::time::Duration;

/// Longest accepted pre-flight wait: one day
pub const MAX_WAIT_SECONDS: f64 = 86_400.0;

/// One repository to sync: merge `origin` into `target` on `owner/repo`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RepositoryTarget {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Branch to merge from
    pub origin: String,
    /// Branch to merge into
    pub target: String,
    /// Seconds to wait before this repository's pipeline starts
    #[serde(default, rename = "wait", alias = "waitSeconds")]
    pub wait_seconds: f64,
}

impl RepositoryTarget {
    /// Repository identity
    pub fn id(&self) -> RepoId {
        RepoId::new(&self.owner, &self.repo)
    }

    /// Pre-flight delay, `None` when no wait is configured
    pub fn wait(&self) -> Option<Duration> {
        if self.wait_seconds > 0.0 {
            Duration::try_from_secs_f64(self.wait_seconds).ok()
        } else {
            None
        }
    }
}

/// Title and body applied verbatim to every pull request of a run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Pattern {
    /// PR title
    pub title: String,
    /// PR body
    pub body: String,
}

/// Process-wide configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Forge token; falls back to the environment when absent
    #[serde(default, alias = "pat")]
    pub credential: Option<String>,
    /// API base URL for GitHub Enterprise (None for github.com)
    #[serde(default)]
    pub api_url: Option<String>,
    /// Repositories to sync, processed independently
    pub repositories: Vec<RepositoryTarget>,
    /// PR title/body template
    pub pattern: Pattern,
}

impl Config {
    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.pattern.title.trim().is_empty() {
            return Err(Error::Config("pattern.title must not be empty".to_string()));
        }

        for (index, target) in self.repositories.iter().enumerate() {
            let fields = [
                ("owner", &target.owner),
                ("repo", &target.repo),
                ("origin", &target.origin),
                ("target", &target.target),
            ];
            for (name, value) in fields {
                if value.trim().is_empty() {
                    return Err(Error::Config(format!(
                        "repositories[{index}].{name} must not be empty"
                    )));
                }
            }
            if !(0.0..=MAX_WAIT_SECONDS).contains(&target.wait_seconds) {
                return Err(Error::Config(format!(
                    "repositories[{index}].wait must be between 0 and {MAX_WAIT_SECONDS} seconds, got {}",
                    target.wait_seconds
                )));
            }
        }

        Ok(())
    }
}
