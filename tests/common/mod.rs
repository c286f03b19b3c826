//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{
    CreateBranchCall, CreatePrCall, CreateReleaseCall, ListBranchesCall, MergePrCall,
    MockPlatformService, UpdateFileCall,
};

use multi_repo_sync::config::{Config, Pattern, RepositoryTarget};
use multi_repo_sync::types::RepoId;

/// Repository target with no pre-flight wait
pub fn target(owner: &str, repo: &str, origin: &str, target: &str) -> RepositoryTarget {
    RepositoryTarget {
        owner: owner.to_string(),
        repo: repo.to_string(),
        origin: origin.to_string(),
        target: target.to_string(),
        wait_seconds: 0.0,
    }
}

/// The PR pattern used across tests
pub fn pattern() -> Pattern {
    Pattern {
        title: "Promote dev to main".to_string(),
        body: "Automated fleet sync".to_string(),
    }
}

/// Config for the given targets
pub fn config_with(repositories: Vec<RepositoryTarget>) -> Config {
    Config {
        credential: Some("test-token".to_string()),
        api_url: None,
        repositories,
        pattern: pattern(),
    }
}

/// Repository identity shorthand
pub fn repo_id(owner: &str, repo: &str) -> RepoId {
    RepoId::new(owner, repo)
}
