//! Configuration
//!
//! Layered configuration built with the `config` crate. Precedence, lowest
//! to highest: built-in defaults, global file
//! (`$XDG_CONFIG_HOME/deskfs/config.toml`), local `deskfs.toml`, and
//! `DESKFS__SECTION__KEY` environment variables.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod storage_paths;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use storage_paths::{StorageBackend, StorageConfig};

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
