//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::DeskConfig;
use crate::error::ApiError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from files and environment, looking for a local
    /// `deskfs.toml` in `dir`.
    pub fn load(dir: &Path) -> Result<DeskConfig, ApiError> {
        Ok(MergeService::load(dir)?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<DeskConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Ok(MergeService::load_from_file(path)?)
    }

    /// Create default configuration.
    pub fn default() -> DeskConfig {
        DeskConfig::default()
    }
}
