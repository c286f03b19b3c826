//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// A resolved GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// The token
    pub token: String,
    /// Where the token was found
    pub source: AuthSource,
}

/// Resolve a GitHub token
///
/// Order: the credential from the config file, `GITHUB_TOKEN`, `GH_TOKEN`,
/// then `gh auth token`. The token is not validated here; the caller checks
/// it against the API before the pipeline starts.
pub async fn get_github_auth(config_credential: Option<&str>) -> Result<GitHubAuthConfig> {
    if let Some(token) = config_credential.map(str::trim)
        && !token.is_empty()
    {
        debug!("using token from config file");
        return Ok(GitHubAuthConfig {
            token: token.to_string(),
            source: AuthSource::Config,
        });
    }

    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var)
            && !token.trim().is_empty()
        {
            debug!(var, "using token from environment");
            return Ok(GitHubAuthConfig {
                token: token.trim().to_string(),
                source: AuthSource::EnvVar,
            });
        }
    }

    if let Some(token) = try_gh_cli().await? {
        debug!("using token from gh CLI");
        return Ok(GitHubAuthConfig {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found. Set `credential` in the config file, export GITHUB_TOKEN, or run `gh auth login`".to_string(),
    ))
}

/// Try to get a token from the GitHub CLI
///
/// Returns `Ok(None)` if gh is not installed or not authenticated.
async fn try_gh_cli() -> Result<Option<String>> {
    let output = tokio::process::Command::new("gh")
        .args(["auth", "token"])
        .output()
        .await;

    match output {
        Ok(output) if output.status.success() => {
            let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
            Ok((!token.is_empty()).then_some(token))
        }
        Ok(_) => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Auth(format!("failed to run `gh auth token`: {e}"))),
    }
}
