//! Kernel: the committed owner of a virtual file system.
//!
//! Holds the tree behind a mutex and expresses every mutation as a
//! transaction: lock, mutate, serialize the snapshot, commit it to the
//! key-value store, unlock, then notify listeners. Readers borrow the tree
//! under the same lock.

use crate::error::{ApiError, FsError, StorageError};
use crate::store::KvStore;
use crate::tree::filesystem::MAX_DEPTH;
use crate::tree::{Cursor, Directory, Snapshot, VirtualFileSystem};
use crate::types::FileKind;
use crate::views::{self, AppRecord, DirectoryEntry, FileRecord};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, error, info};

/// What a committed transaction changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    FileWritten { name: String, kind: FileKind },
    FileRemoved { name: String, kind: FileKind },
    FileRenamed { from: String, to: String, kind: FileKind },
    FileReformatted { name: String, to: FileKind },
    DirectoryCreated { name: String },
    DirectoryRemoved { name: String },
    DirectoryRenamed { from: String, to: String },
    DirectoryChanged { path: String },
    Restored,
    Synced,
}

/// Delivered to listeners after each successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelEvent {
    /// Count of commits made by this kernel, starting at 1.
    pub generation: u64,
    pub change: Change,
}

pub type Listener = Arc<dyn Fn(&KernelEvent) + Send + Sync>;

struct State {
    fs: VirtualFileSystem,
    generation: u64,
}

pub struct Kernel {
    state: Mutex<State>,
    store: Arc<dyn KvStore>,
    key: String,
    listeners: RwLock<Vec<Listener>>,
}

impl Kernel {
    /// Open a kernel over `store`, restoring the snapshot under `key` if one
    /// exists. A snapshot that cannot be decoded is an error, never replaced.
    pub fn open(store: Arc<dyn KvStore>, key: impl Into<String>) -> Result<Self, ApiError> {
        let key = key.into();
        let fs = match store.load(&key)? {
            Some(bytes) => {
                let snapshot = Snapshot::from_json(&key, &bytes)?;
                info!(key = %key, entries = snapshot.files.len(), cursor = %snapshot.cursor, "Restored snapshot");
                VirtualFileSystem::from_snapshot(snapshot)
            }
            None => {
                info!(key = %key, "No snapshot found, starting empty");
                VirtualFileSystem::new()
            }
        };
        Ok(Self {
            state: Mutex::new(State { fs, generation: 0 }),
            store,
            key,
            listeners: RwLock::new(Vec::new()),
        })
    }

    pub fn snapshot_key(&self) -> &str {
        &self.key
    }

    /// Register a listener called after every committed change.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(&KernelEvent) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Run `mutate` against the tree and commit the resulting snapshot.
    ///
    /// If the commit fails the in-memory mutation stands and the error is
    /// returned; the next successful commit persists it.
    pub fn transact<R, F>(&self, change: Change, mutate: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut VirtualFileSystem) -> Result<R, FsError>,
    {
        let (result, event) = {
            let mut state = self.state.lock();
            let result = mutate(&mut state.fs)?;
            self.commit_locked(&state.fs)?;
            state.generation += 1;
            (
                result,
                KernelEvent {
                    generation: state.generation,
                    change,
                },
            )
        };
        debug!(generation = event.generation, change = ?event.change, "Committed");
        self.notify(&event);
        Ok(result)
    }

    fn commit_locked(&self, fs: &VirtualFileSystem) -> Result<(), StorageError> {
        let bytes = fs.snapshot().to_json()?;
        self.store.commit(&self.key, &bytes).map_err(|e| {
            error!(key = %self.key, error = %e, "Failed to commit snapshot");
            e
        })
    }

    fn notify(&self, event: &KernelEvent) {
        let listeners: Vec<Listener> = self.listeners.read().clone();
        for listener in listeners {
            listener(event);
        }
    }

    /// Borrow the tree for a read-only query.
    pub fn read<R>(&self, query: impl FnOnce(&VirtualFileSystem) -> R) -> R {
        let state = self.state.lock();
        query(&state.fs)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read(|fs| fs.snapshot())
    }

    pub fn cursor(&self) -> Cursor {
        self.read(|fs| fs.cursor().clone())
    }

    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn add_file(&self, name: &str, content: &str, kind: FileKind) -> Result<Option<String>, ApiError> {
        self.transact(
            Change::FileWritten {
                name: name.to_string(),
                kind,
            },
            |fs| fs.create_file(name, kind, content),
        )
    }

    pub fn update_file(&self, name: &str, content: &str, kind: FileKind) -> Result<Option<String>, ApiError> {
        self.transact(
            Change::FileWritten {
                name: name.to_string(),
                kind,
            },
            |fs| fs.update_file(name, kind, content),
        )
    }

    pub fn remove_file(&self, name: &str, kind: FileKind) -> Result<bool, ApiError> {
        self.transact(
            Change::FileRemoved {
                name: name.to_string(),
                kind,
            },
            |fs| Ok(fs.delete_file(name, kind)?.is_some()),
        )
    }

    pub fn rename_file(&self, old_name: &str, new_name: &str, kind: FileKind) -> Result<bool, ApiError> {
        self.transact(
            Change::FileRenamed {
                from: old_name.to_string(),
                to: new_name.to_string(),
                kind,
            },
            |fs| fs.rename_file(old_name, new_name, kind),
        )
    }

    /// Change a file's kind. With `from` the file is looked up by exact
    /// kind; without it the first file with that name is taken. Returns the
    /// kind the file had, or `None` if nothing matched.
    pub fn reformat_file(
        &self,
        name: &str,
        from: Option<FileKind>,
        to: FileKind,
    ) -> Result<Option<FileKind>, ApiError> {
        self.transact(
            Change::FileReformatted {
                name: name.to_string(),
                to,
            },
            |fs| match from {
                Some(from) => Ok(fs.reformat_file(name, from, to)?.then_some(from)),
                None => fs.reformat_first(name, to),
            },
        )
    }

    pub fn add_directory(&self, name: &str) -> Result<bool, ApiError> {
        self.transact(
            Change::DirectoryCreated {
                name: name.to_string(),
            },
            |fs| fs.create_folder(name),
        )
    }

    pub fn remove_directory(&self, name: &str) -> Result<Option<Directory>, ApiError> {
        self.transact(
            Change::DirectoryRemoved {
                name: name.to_string(),
            },
            |fs| fs.delete_folder(name),
        )
    }

    pub fn rename_directory(&self, old_name: &str, new_name: &str) -> Result<bool, ApiError> {
        self.transact(
            Change::DirectoryRenamed {
                from: old_name.to_string(),
                to: new_name.to_string(),
            },
            |fs| fs.rename_folder(old_name, new_name),
        )
    }

    /// Move the cursor; returns the new current path.
    pub fn change_directory(&self, path: &str) -> Result<Cursor, ApiError> {
        self.transact(
            Change::DirectoryChanged {
                path: path.to_string(),
            },
            |fs| {
                fs.change_directory(path)?;
                Ok(fs.cursor().clone())
            },
        )
    }

    /// Replace the whole tree and cursor, then commit. Trees nested deeper
    /// than [`MAX_DEPTH`] are refused.
    pub fn restore(&self, snapshot: Snapshot) -> Result<(), ApiError> {
        if snapshot.files.height() > MAX_DEPTH {
            return Err(FsError::TooDeep(MAX_DEPTH).into());
        }
        self.transact(Change::Restored, |fs| {
            fs.restore_fs(snapshot.files, snapshot.cursor);
            Ok(())
        })
    }

    /// Commit the current state without changing it.
    pub fn sync(&self) -> Result<(), ApiError> {
        self.transact(Change::Synced, |_| Ok(()))
    }

    pub fn list_current(&self) -> Result<Vec<DirectoryEntry>, ApiError> {
        self.read(|fs| Ok(views::list_directory(fs.current_dir()?)))
    }

    pub fn fetch_all(&self) -> Vec<FileRecord> {
        self.read(|fs| views::flatten(fs.files()))
    }

    pub fn fetch_kind(&self, kind: FileKind) -> Vec<FileRecord> {
        self.read(|fs| views::fetch_kind(fs.files(), kind))
    }

    pub fn fetch_apps(&self) -> Vec<AppRecord> {
        self.read(|fs| views::fetch_apps(fs.files()))
    }

    pub fn fetch_photos(&self) -> Vec<FileRecord> {
        self.read(|fs| views::fetch_photos(fs.files()))
    }

    pub fn fetch_music(&self) -> Vec<FileRecord> {
        self.read(|fs| views::fetch_music(fs.files()))
    }

    pub fn fetch_videos(&self) -> Vec<FileRecord> {
        self.read(|fs| views::fetch_videos(fs.files()))
    }

    pub fn fetch_documents(&self) -> Vec<FileRecord> {
        self.read(|fs| views::fetch_documents(fs.files()))
    }
}
