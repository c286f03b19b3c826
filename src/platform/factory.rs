//! Platform service construction

use crate::auth::get_github_auth;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::platform::{GitHubService, PlatformService};
use tracing::info;

/// Create a platform service for the configured forge
///
/// Resolves the token, builds the client and checks the token by fetching
/// the authenticated user. A rejected token aborts the run here, before any
/// repository is touched.
pub async fn create_platform_service(config: &Config) -> Result<Box<dyn PlatformService>> {
    let auth = get_github_auth(config.credential.as_deref()).await?;
    let service = GitHubService::new(&auth.token, config.api_url.as_deref())?;

    let login = service
        .current_user()
        .await
        .map_err(|e| Error::Auth(format!("token from {} was rejected: {e}", auth.source)))?;
    info!(user = %login, source = %auth.source, "authenticated with GitHub");

    Ok(Box::new(service))
}
