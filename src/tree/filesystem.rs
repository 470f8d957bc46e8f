//! VirtualFileSystem: the directory tree and its operations.
//!
//! Every file and folder operation acts on the directory the cursor points
//! at. Collisions overwrite and missing entries are no-ops; both are reported
//! through return values rather than errors.

use crate::error::FsError;
use crate::tree::codec::{encode_key, is_file_key, Snapshot};
use crate::tree::cursor::Cursor;
use crate::tree::node::{Directory, FileEntry, Node};
use crate::types::{EntryType, FileKind};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;

/// Deepest folder level below the root. Snapshots of deeper trees would
/// exceed the JSON decoder's nesting limit.
pub const MAX_DEPTH: usize = 64;

/// Normalize a file name to NFC. Any non-empty name is accepted.
pub fn validate_file_name(name: &str) -> Result<String, FsError> {
    let normalized: String = name.nfc().collect();
    if normalized.is_empty() {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(normalized)
}

/// Normalize a folder name to NFC. Folder names become cursor segments and
/// bare snapshot keys, so `.`, `..`, names containing `/`, and names spelled
/// like an encoded file key (`1-Cat`) are rejected.
pub fn validate_folder_name(name: &str) -> Result<String, FsError> {
    let normalized = validate_file_name(name)?;
    if normalized == "." || normalized == ".." || normalized.contains('/') || is_file_key(&normalized)
    {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(normalized)
}

fn ensure_key_free(dir: &Directory, key: &str) -> Result<(), FsError> {
    if dir.has_foreign(key) {
        return Err(FsError::KeyInUse(key.to_string()));
    }
    Ok(())
}

/// In-memory hierarchical file tree with a current-directory cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualFileSystem {
    files: Directory,
    cursor: Cursor,
}

impl VirtualFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from a persisted snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut fs = Self::new();
        fs.restore_fs(snapshot.files, snapshot.cursor);
        fs
    }

    pub fn files(&self) -> &Directory {
        &self.files
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            files: self.files.clone(),
            cursor: self.cursor.clone(),
        }
    }

    /// The directory the cursor points at.
    pub fn current_dir(&self) -> Result<&Directory, FsError> {
        resolve(&self.files, &self.cursor)
    }

    /// The directory at `path`, resolved like [`change_directory`](Self::change_directory)
    /// but without moving the cursor.
    pub fn directory_at(&self, path: &str) -> Result<&Directory, FsError> {
        resolve(&self.files, &self.cursor.join(path))
    }

    fn current_dir_mut(&mut self) -> Result<&mut Directory, FsError> {
        let mut dir = &mut self.files;
        for (depth, segment) in self.cursor.segments().iter().enumerate() {
            if dir.get_dir(segment).is_none() {
                let prefix = Cursor::from_segments(self.cursor.segments()[..=depth].iter().cloned());
                return Err(missing_dir_error(dir, segment, &prefix));
            }
            dir = match dir.get_dir_mut(segment) {
                Some(next) => next,
                None => return Err(FsError::NotFound(self.cursor.to_string())),
            };
        }
        Ok(dir)
    }

    /// Move the cursor. `path` is absolute when it starts with `/`, otherwise
    /// relative to the current directory; `..` steps up.
    pub fn change_directory(&mut self, path: &str) -> Result<(), FsError> {
        let target = self.cursor.join(path);
        resolve(&self.files, &target)?;
        debug!(from = %self.cursor, to = %target, "Changed directory");
        self.cursor = target;
        Ok(())
    }

    /// Insert a file, replacing any file with the same name and kind.
    /// Returns the replaced content.
    pub fn create_file(
        &mut self,
        name: &str,
        kind: FileKind,
        content: impl Into<String>,
    ) -> Result<Option<String>, FsError> {
        let name = validate_file_name(name)?;
        let dir = self.current_dir_mut()?;
        ensure_key_free(dir, &encode_key(kind, &name))?;
        let previous = dir.insert(name.clone(), Node::File(FileEntry::new(kind, content)));
        debug!(name = %name, kind = %kind, overwritten = previous.is_some(), "Wrote file");
        Ok(previous.and_then(into_content))
    }

    /// Replace a file's content. Same effect as [`create_file`](Self::create_file).
    pub fn update_file(
        &mut self,
        name: &str,
        kind: FileKind,
        content: impl Into<String>,
    ) -> Result<Option<String>, FsError> {
        self.create_file(name, kind, content)
    }

    /// Remove a file. Returns `None` when nothing matched.
    pub fn delete_file(&mut self, name: &str, kind: FileKind) -> Result<Option<FileEntry>, FsError> {
        let name = validate_file_name(name)?;
        let dir = self.current_dir_mut()?;
        let removed = match dir.remove(&name, EntryType::File(kind)) {
            Some(Node::File(file)) => Some(file),
            _ => None,
        };
        debug!(name = %name, kind = %kind, removed = removed.is_some(), "Deleted file");
        Ok(removed)
    }

    /// Move a file's content to a new name, keeping its kind. A file already
    /// under the new name is overwritten. Returns `false` if the source is
    /// missing.
    pub fn rename_file(
        &mut self,
        old_name: &str,
        new_name: &str,
        kind: FileKind,
    ) -> Result<bool, FsError> {
        let old_name = validate_file_name(old_name)?;
        let new_name = validate_file_name(new_name)?;
        let dir = self.current_dir_mut()?;
        if !dir.contains(&old_name, EntryType::File(kind)) {
            return Ok(false);
        }
        ensure_key_free(dir, &encode_key(kind, &new_name))?;
        let Some(node) = dir.remove(&old_name, EntryType::File(kind)) else {
            return Ok(false);
        };
        dir.insert(new_name.clone(), node);
        debug!(from = %old_name, to = %new_name, kind = %kind, "Renamed file");
        Ok(true)
    }

    /// Change a file's kind from `from` to `to`, keeping name and content.
    /// A file already holding `(name, to)` is overwritten. Returns `false` if
    /// `(name, from)` is missing.
    pub fn reformat_file(&mut self, name: &str, from: FileKind, to: FileKind) -> Result<bool, FsError> {
        let name = validate_file_name(name)?;
        let dir = self.current_dir_mut()?;
        if !dir.contains(&name, EntryType::File(from)) {
            return Ok(false);
        }
        ensure_key_free(dir, &encode_key(to, &name))?;
        let Some(Node::File(mut file)) = dir.remove(&name, EntryType::File(from)) else {
            return Ok(false);
        };
        file.kind = to;
        dir.insert(name.clone(), Node::File(file));
        debug!(name = %name, from = %from, to = %to, "Reformatted file");
        Ok(true)
    }

    /// Re-tag the first file named `name` (in listing order) as `to`.
    /// Returns the kind it had, or `None` if no file has that name.
    pub fn reformat_first(&mut self, name: &str, to: FileKind) -> Result<Option<FileKind>, FsError> {
        let name = validate_file_name(name)?;
        let Some(from) = self.current_dir()?.first_file_named(&name) else {
            return Ok(None);
        };
        self.reformat_file(&name, from, to)?;
        Ok(Some(from))
    }

    /// Create an empty folder. An existing folder is left untouched and
    /// `false` is returned. Fails with `TooDeep` below [`MAX_DEPTH`].
    pub fn create_folder(&mut self, name: &str) -> Result<bool, FsError> {
        let name = validate_folder_name(name)?;
        if self.cursor.segments().len() >= MAX_DEPTH {
            return Err(FsError::TooDeep(MAX_DEPTH));
        }
        let dir = self.current_dir_mut()?;
        if dir.contains(&name, EntryType::Directory) {
            return Ok(false);
        }
        ensure_key_free(dir, &name)?;
        dir.insert(name.clone(), Node::Directory(Directory::new()));
        debug!(name = %name, "Created folder");
        Ok(true)
    }

    /// Remove a folder and everything beneath it.
    pub fn delete_folder(&mut self, name: &str) -> Result<Option<Directory>, FsError> {
        let name = validate_file_name(name)?;
        let dir = self.current_dir_mut()?;
        let removed = match dir.remove(&name, EntryType::Directory) {
            Some(Node::Directory(subtree)) => Some(subtree),
            _ => None,
        };
        debug!(name = %name, removed = removed.is_some(), "Deleted folder");
        Ok(removed)
    }

    /// Move a folder's subtree to a new name. A folder already under the new
    /// name is replaced. Returns `false` if the source is missing.
    pub fn rename_folder(&mut self, old_name: &str, new_name: &str) -> Result<bool, FsError> {
        let old_name = validate_file_name(old_name)?;
        let new_name = validate_folder_name(new_name)?;
        let dir = self.current_dir_mut()?;
        if !dir.contains(&old_name, EntryType::Directory) {
            return Ok(false);
        }
        ensure_key_free(dir, &new_name)?;
        let Some(subtree) = dir.remove(&old_name, EntryType::Directory) else {
            return Ok(false);
        };
        dir.insert(new_name.clone(), subtree);
        debug!(from = %old_name, to = %new_name, "Renamed folder");
        Ok(true)
    }

    /// Replace the whole tree and cursor. The tree is taken as is; a cursor
    /// that does not name a directory in it falls back to the root.
    pub fn restore_fs(&mut self, files: Directory, cursor: Cursor) {
        self.files = files;
        self.cursor = match resolve(&self.files, &cursor) {
            Ok(_) => cursor,
            Err(e) => {
                warn!(cursor = %cursor, error = %e, "Restored cursor does not resolve, resetting to root");
                Cursor::root()
            }
        };
    }
}

fn into_content(node: Node) -> Option<String> {
    match node {
        Node::File(file) => Some(file.content),
        Node::Directory(_) => None,
    }
}

fn missing_dir_error(parent: &Directory, segment: &str, path: &Cursor) -> FsError {
    if parent.first_file_named(segment).is_some() {
        FsError::NotADirectory(path.to_string())
    } else {
        FsError::NotFound(path.to_string())
    }
}

/// Walk `cursor` down from `root`.
pub(crate) fn resolve<'a>(root: &'a Directory, cursor: &Cursor) -> Result<&'a Directory, FsError> {
    let mut dir = root;
    for (depth, segment) in cursor.segments().iter().enumerate() {
        dir = match dir.get_dir(segment) {
            Some(next) => next,
            None => {
                let prefix = Cursor::from_segments(cursor.segments()[..=depth].iter().cloned());
                return Err(missing_dir_error(dir, segment, &prefix));
            }
        };
    }
    Ok(dir)
}
