//! XDG base directories for the store and the global config file.

use crate::error::ApiError;
use std::path::PathBuf;

/// `$<var>` when set and non-empty, otherwise `$HOME/<fallback>`.
fn base_dir(var: &str, fallback: &[&str]) -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(var).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").filter(|v| !v.is_empty())?;
    Some(fallback.iter().fold(PathBuf::from(home), |path, part| path.join(part)))
}

fn require(dir: Option<PathBuf>, what: &str) -> Result<PathBuf, ApiError> {
    dir.ok_or_else(|| {
        ApiError::ConfigError(format!(
            "Could not determine XDG {} directory (HOME not set)",
            what
        ))
    })
}

/// `$XDG_DATA_HOME`, defaulting to `~/.local/share`
pub fn data_home() -> Option<PathBuf> {
    base_dir("XDG_DATA_HOME", &[".local", "share"])
}

/// `$XDG_CONFIG_HOME`, defaulting to `~/.config`
pub fn config_home() -> Result<PathBuf, ApiError> {
    require(base_dir("XDG_CONFIG_HOME", &[".config"]), "config home")
}

/// Default sled store location: `$XDG_DATA_HOME/deskfs/store`
pub fn default_store_dir() -> Result<PathBuf, ApiError> {
    Ok(require(data_home(), "data home")?.join("deskfs").join("store"))
}

/// Global config file: `$XDG_CONFIG_HOME/deskfs/config.toml`
pub fn global_config_file() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join("deskfs").join("config.toml"))
}
