//! Tree node types

use crate::types::{EntryType, FileKind};

/// Leaf payload: a typed, opaque content string (usually a URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub kind: FileKind,
    pub content: String,
}

impl FileEntry {
    pub fn new(kind: FileKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// A tree element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(FileEntry),
}

impl Node {
    pub fn entry_type(&self) -> EntryType {
        match self {
            Node::Directory(_) => EntryType::Directory,
            Node::File(file) => EntryType::File(file.kind),
        }
    }
}

/// Directory node: children in insertion order.
///
/// A child is identified by its name together with its [`EntryType`], so a
/// folder and a file (or two files of different kinds) may share a name.
/// Two files with the same name and kind occupy one slot.
///
/// Persisted entries that cannot be read as a file or folder are kept
/// verbatim under their original key and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<(String, Node)>,
    foreign: Vec<(String, serde_json::Value)>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unreadable persisted entries, by raw key.
    pub fn foreign(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> + '_ {
        self.foreign.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn has_foreign(&self, key: &str) -> bool {
        self.foreign.iter().any(|(k, _)| k == key)
    }

    pub(crate) fn keep_foreign(&mut self, key: String, value: serde_json::Value) {
        self.foreign.push((key, value));
    }

    /// Number of folder levels below this one.
    pub fn height(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|(_, node)| match node {
                Node::Directory(dir) => Some(1 + dir.height()),
                Node::File(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Children in listing order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> + '_ {
        self.entries.iter().map(|(name, node)| (name.as_str(), node))
    }

    fn position(&self, name: &str, entry_type: EntryType) -> Option<usize> {
        self.entries
            .iter()
            .position(|(n, node)| n == name && node.entry_type() == entry_type)
    }

    pub fn get(&self, name: &str, entry_type: EntryType) -> Option<&Node> {
        self.position(name, entry_type).map(|i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str, entry_type: EntryType) -> bool {
        self.position(name, entry_type).is_some()
    }

    pub fn get_file(&self, name: &str, kind: FileKind) -> Option<&FileEntry> {
        match self.get(name, EntryType::File(kind)) {
            Some(Node::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn get_dir(&self, name: &str) -> Option<&Directory> {
        match self.get(name, EntryType::Directory) {
            Some(Node::Directory(dir)) => Some(dir),
            _ => None,
        }
    }

    pub fn get_dir_mut(&mut self, name: &str) -> Option<&mut Directory> {
        let index = self.position(name, EntryType::Directory)?;
        match &mut self.entries[index].1 {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    /// Insert a child. A child with the same identity is replaced in place
    /// and returned; otherwise the new child is appended.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        let name = name.into();
        match self.position(&name, node.entry_type()) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, node)),
            None => {
                self.entries.push((name, node));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str, entry_type: EntryType) -> Option<Node> {
        let index = self.position(name, entry_type)?;
        Some(self.entries.remove(index).1)
    }

    /// Kind of the first file named `name` in listing order.
    pub fn first_file_named(&self, name: &str) -> Option<FileKind> {
        self.entries.iter().find_map(|(n, node)| match node {
            Node::File(file) if n == name => Some(file.kind),
            _ => None,
        })
    }
}
