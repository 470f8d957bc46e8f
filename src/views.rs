//! File Views
//!
//! Read-only queries over a tree: flatten every file into one list, filter
//! it by kind, or list a single directory. All queries are pure functions of
//! the tree they are given.

use crate::tree::node::{Directory, Node};
use crate::types::{EntryType, FileKind};
use serde::{Deserialize, Serialize};

/// One file found anywhere in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub content: String,
}

/// An app record; an app's content is its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    #[serde(flatten)]
    pub file: FileRecord,
    pub url: String,
}

/// Depth-first pre-order iterator over every file in a tree.
pub struct Walk<'a> {
    stack: Vec<Box<dyn Iterator<Item = (&'a str, &'a Node)> + 'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = FileRecord;

    fn next(&mut self) -> Option<FileRecord> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some((name, Node::File(file))) => {
                    return Some(FileRecord {
                        name: name.to_string(),
                        kind: file.kind,
                        content: file.content.clone(),
                    });
                }
                Some((_, Node::Directory(dir))) => self.stack.push(Box::new(dir.iter())),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Iterate every file under `dir`, descending into folders as they are met.
pub fn walk(dir: &Directory) -> Walk<'_> {
    Walk {
        stack: vec![Box::new(dir.iter())],
    }
}

/// Every file in the tree, in depth-first order.
pub fn flatten(dir: &Directory) -> Vec<FileRecord> {
    walk(dir).collect()
}

pub fn fetch_kind(dir: &Directory, kind: FileKind) -> Vec<FileRecord> {
    walk(dir).filter(|record| record.kind == kind).collect()
}

pub fn fetch_apps(dir: &Directory) -> Vec<AppRecord> {
    walk(dir)
        .filter(|record| record.kind == FileKind::App)
        .map(|file| AppRecord {
            url: file.content.clone(),
            file,
        })
        .collect()
}

pub fn fetch_photos(dir: &Directory) -> Vec<FileRecord> {
    fetch_kind(dir, FileKind::Image)
}

pub fn fetch_music(dir: &Directory) -> Vec<FileRecord> {
    fetch_kind(dir, FileKind::Music)
}

pub fn fetch_videos(dir: &Directory) -> Vec<FileRecord> {
    fetch_kind(dir, FileKind::Video)
}

pub fn fetch_documents(dir: &Directory) -> Vec<FileRecord> {
    fetch_kind(dir, FileKind::Document)
}

/// One direct child of a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// File content; `None` for directories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Number of direct children; `None` for files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<usize>,
}

/// Direct children of `dir` in listing order.
pub fn list_directory(dir: &Directory) -> Vec<DirectoryEntry> {
    dir.iter()
        .map(|(name, node)| match node {
            Node::Directory(sub) => DirectoryEntry {
                name: name.to_string(),
                entry_type: EntryType::Directory,
                content: None,
                children: Some(sub.len()),
            },
            Node::File(file) => DirectoryEntry {
                name: name.to_string(),
                entry_type: EntryType::File(file.kind),
                content: Some(file.content.clone()),
                children: None,
            },
        })
        .collect()
}

/// Per-kind file count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindCount {
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub files: usize,
}

/// Whole-tree totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeStats {
    pub directories: usize,
    pub files: usize,
    pub by_kind: Vec<KindCount>,
}

pub fn tree_stats(dir: &Directory) -> TreeStats {
    fn count_dirs(dir: &Directory) -> usize {
        dir.iter()
            .map(|(_, node)| match node {
                Node::Directory(sub) => 1 + count_dirs(sub),
                Node::File(_) => 0,
            })
            .sum()
    }

    let mut by_kind: Vec<KindCount> = FileKind::ALL
        .iter()
        .map(|kind| KindCount {
            kind: *kind,
            files: 0,
        })
        .collect();
    let mut files = 0;
    for record in walk(dir) {
        files += 1;
        if let Some(slot) = by_kind.iter_mut().find(|c| c.kind == record.kind) {
            slot.files += 1;
        }
    }
    TreeStats {
        directories: count_dirs(dir),
        files,
        by_kind,
    }
}
