//! Virtual file tree
//!
//! Typed directory tree, current-directory cursor, and the persisted
//! snapshot format.

pub mod codec;
pub mod cursor;
pub mod filesystem;
pub mod node;

pub use codec::{find_type, Snapshot, DEFAULT_SNAPSHOT_KEY};
pub use cursor::Cursor;
pub use filesystem::{VirtualFileSystem, MAX_DEPTH};
pub use node::{Directory, FileEntry, Node};
