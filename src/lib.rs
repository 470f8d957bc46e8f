//! deskfs: Virtual Desktop File System
//!
//! An in-memory tree of typed files (images, documents, music, videos, apps)
//! and folders, with a current-directory cursor, type-filtered queries, and
//! snapshot persistence through a pluggable key-value store.

pub mod config;
pub mod error;
pub mod kernel;
pub mod logging;
pub mod seed;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod views;

pub use error::{ApiError, FsError, StorageError};
pub use kernel::{Change, Kernel, KernelEvent};
pub use tree::{Cursor, Directory, FileEntry, Node, Snapshot, VirtualFileSystem};
pub use types::{EntryType, FileKind};
