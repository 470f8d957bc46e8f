//! Core types for the virtual desktop file system.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Content type of a file.
///
/// Each kind has a one-character code used by the persisted key format
/// (`1`=image, `2`=document, `3`=music, `4`=video, `5`=app) and a label used
/// in query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Document,
    Music,
    Video,
    App,
}

impl FileKind {
    /// All kinds in type-code order.
    pub const ALL: [FileKind; 5] = [
        FileKind::Image,
        FileKind::Document,
        FileKind::Music,
        FileKind::Video,
        FileKind::App,
    ];

    pub fn code(self) -> char {
        match self {
            FileKind::Image => '1',
            FileKind::Document => '2',
            FileKind::Music => '3',
            FileKind::Video => '4',
            FileKind::App => '5',
        }
    }

    /// Decode a type code. Unknown codes yield `None`.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '1' => Some(FileKind::Image),
            '2' => Some(FileKind::Document),
            '3' => Some(FileKind::Music),
            '4' => Some(FileKind::Video),
            '5' => Some(FileKind::App),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Document => "document",
            FileKind::Music => "music",
            FileKind::Video => "video",
            FileKind::App => "app",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FileKind {
    type Err = String;

    /// Accepts a label (`image`) or a type code (`1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if let Some(kind) = FileKind::ALL.iter().find(|k| k.label() == lowered) {
            return Ok(*kind);
        }
        let mut chars = lowered.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => FileKind::from_code(c),
            _ => None,
        }
        .ok_or_else(|| {
            format!(
                "unknown file type '{}' (expected image, document, music, video or app)",
                s
            )
        })
    }
}

/// What a directory entry is: a nested directory or a file of some kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Directory,
    File(FileKind),
}

impl EntryType {
    pub fn label(self) -> &'static str {
        match self {
            EntryType::Directory => "directory",
            EntryType::File(kind) => kind.label(),
        }
    }

    pub fn is_directory(self) -> bool {
        matches!(self, EntryType::Directory)
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for EntryType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
