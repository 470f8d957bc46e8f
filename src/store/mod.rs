//! Snapshot Store
//!
//! Key-value persistence port the kernel commits snapshots through.
//! Values are opaque bytes; the kernel stores JSON-encoded snapshots.

pub mod persistence;

use crate::error::StorageError;

pub use crate::tree::codec::{Snapshot, DEFAULT_SNAPSHOT_KEY};
pub use persistence::{MemoryKvStore, SledKvStore};

/// Key-value store interface
pub trait KvStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value.
    fn commit(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
