//! Locating and reading the configuration file.

use super::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILE: &str = "config.json";

/// Directory name under the user config dir.
const APP_DIR: &str = "multi-repo-sync";

/// Config path inside the user's config directory, if one exists on this platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Resolve which configuration file to read.
///
/// An explicit path always wins. Otherwise `./config.json` is used when it
/// exists, then the user config directory. Falls back to `./config.json` so
/// the load error names a sensible path.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return local;
    }

    if let Some(path) = default_config_path()
        && path.is_file()
    {
        return path;
    }

    local
}

/// Load and validate a configuration file.
///
/// Files ending in `.toml` are parsed as TOML, everything else as JSON.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config: Config = if is_toml {
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?
    } else {
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?
    };

    config.validate()?;
    Ok(config)
}
