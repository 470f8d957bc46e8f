//! StorageConfig: which key-value backend to open and where.

use crate::config::xdg;
use crate::error::ApiError;
use crate::store::{KvStore, MemoryKvStore, SledKvStore, DEFAULT_SNAPSHOT_KEY};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Key-value backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sled,
    Memory,
}

fn default_snapshot_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// sled database directory; `None` means the XDG data default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Key the snapshot is committed under
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
}

impl StorageConfig {
    /// Resolve the sled store directory.
    pub fn resolve_path(&self) -> Result<PathBuf, ApiError> {
        match &self.path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => xdg::default_store_dir(),
        }
    }

    /// Open the configured backend.
    pub fn open_store(&self) -> Result<Arc<dyn KvStore>, ApiError> {
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryKvStore::new())),
            StorageBackend::Sled => {
                let path = self.resolve_path()?;
                Ok(Arc::new(SledKvStore::open(&path)?))
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            snapshot_key: default_snapshot_key(),
        }
    }
}
