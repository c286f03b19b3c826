//! Authentication for GitHub
//!
//! Supports a token from the config file, environment variables and the
//! GitHub CLI (gh).

mod github;

pub use github::{GitHubAuthConfig, get_github_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the configuration file
    Config,
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh)
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config => write!(f, "config file"),
            Self::EnvVar => write!(f, "environment variable"),
            Self::Cli => write!(f, "GitHub CLI (gh auth token)"),
        }
    }
}
