//! Error types
//!
//! Three layers: `FsError` for tree operations, `StorageError` for the
//! key-value persistence port, and `ApiError` for the kernel, config and CLI.

use thiserror::Error;

/// Errors raised by `VirtualFileSystem` operations.
///
/// Missing entries and collisions are not errors; operations report them
/// through their return values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("no such directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("invalid name: {0:?}")]
    InvalidName(String),

    /// Folders may not nest deeper than the given number of levels.
    #[error("folders nest at most {0} levels deep")]
    TooDeep(usize),

    /// The persisted key is held by an unreadable entry kept from a snapshot.
    #[error("key {0:?} is held by an unreadable snapshot entry")]
    KeyInUse(String),
}

/// Errors raised by key-value store backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("corrupt snapshot under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Top-level error surfaced by the kernel, configuration and CLI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    FileSystem(#[from] FsError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
