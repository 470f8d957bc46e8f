//! Persisted snapshot format.
//!
//! A snapshot is `{"files": {...}, "cursor": "/A/B"}`. Inside `files`,
//! directories appear under their bare name with a nested object as value,
//! and files appear under an encoded key `<type code><separator><name>` with
//! their content string as value:
//!
//! ```json
//! {"files": {"Images": {"1-Cat.jpg": "https://example.com/cat.jpg"}}, "cursor": "/"}
//! ```
//!
//! Decoding strips the first two characters of a file key to recover the
//! display name, whatever the separator character is. Entries that cannot be
//! read as a file or folder (unknown type codes, empty names, non-string
//! scalars, folders with unusable names) are kept verbatim and written back
//! under their original key.

use crate::error::StorageError;
use crate::tree::cursor::Cursor;
use crate::tree::filesystem::{validate_file_name, validate_folder_name};
use crate::tree::node::{Directory, FileEntry, Node};
use crate::types::{EntryType, FileKind};
use serde::de::{self, DeserializeSeed, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Separator written between the type code and the display name.
pub const KEY_SEPARATOR: char = '-';

/// Storage key snapshots are committed under unless configured otherwise.
pub const DEFAULT_SNAPSHOT_KEY: &str = "fileSystemState";

/// Serializable `{files, cursor}` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub files: Directory,
    #[serde(default)]
    pub cursor: Cursor,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<Vec<u8>, StorageError> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode a snapshot read from storage under `key`.
    pub fn from_json(key: &str, bytes: &[u8]) -> Result<Self, StorageError> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Encode a file's map key.
pub fn encode_key(kind: FileKind, name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 2);
    key.push(kind.code());
    key.push(KEY_SEPARATOR);
    key.push_str(name);
    key
}

/// Decode a file's map key into kind and display name. Keys shorter than the
/// two-character prefix or with an unknown type code yield `None`.
pub fn decode_key(key: &str) -> Option<(FileKind, &str)> {
    let mut chars = key.chars();
    let kind = FileKind::from_code(chars.next()?)?;
    chars.next()?;
    Some((kind, chars.as_str()))
}

/// Whether `name` is spelled like an encoded file key, `<code>-<name>`.
/// Folders may not use such names or their keys would clash with files.
pub fn is_file_key(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().and_then(FileKind::from_code).is_some() && chars.next() == Some(KEY_SEPARATOR)
}

/// Classify a raw persisted entry: any non-string value is a directory,
/// otherwise the key's type code decides. Unknown codes yield `None`.
pub fn find_type(key: &str, value: &serde_json::Value) -> Option<EntryType> {
    if !value.is_string() {
        return Some(EntryType::Directory);
    }
    key.chars()
        .next()
        .and_then(FileKind::from_code)
        .map(EntryType::File)
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len() + self.foreign().count()))?;
        for (name, node) in self.iter() {
            match node {
                Node::Directory(dir) => map.serialize_entry(name, dir)?,
                Node::File(file) => {
                    map.serialize_entry(&encode_key(file.kind, name), &file.content)?
                }
            }
        }
        for (key, value) in self.foreign() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One persisted value: file content, a nested directory, or anything else.
enum RawEntry {
    Content(String),
    Directory(Directory),
    Other(serde_json::Value),
}

struct EntrySeed;

impl<'de> DeserializeSeed<'de> for EntrySeed {
    type Value = RawEntry;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<RawEntry, D::Error> {
        deserializer.deserialize_any(EntryVisitor)
    }
}

struct EntryVisitor;

impl<'de> Visitor<'de> for EntryVisitor {
    type Value = RawEntry;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a content string or a map of directory entries")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RawEntry, E> {
        Ok(RawEntry::Content(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<RawEntry, E> {
        Ok(RawEntry::Content(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, access: A) -> Result<RawEntry, A::Error> {
        DirectoryVisitor.visit_map(access).map(RawEntry::Directory)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<RawEntry, E> {
        Ok(RawEntry::Other(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RawEntry, E> {
        Ok(RawEntry::Other(Value::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RawEntry, E> {
        Ok(RawEntry::Other(Value::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<RawEntry, E> {
        Ok(RawEntry::Other(Value::from(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<RawEntry, E> {
        Ok(RawEntry::Other(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<RawEntry, E> {
        Ok(RawEntry::Other(Value::Null))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RawEntry, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(RawEntry::Other(Value::Array(items)))
    }
}

struct DirectoryVisitor;

impl<'de> Visitor<'de> for DirectoryVisitor {
    type Value = Directory;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of directory entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Directory, A::Error> {
        let mut dir = Directory::new();
        while let Some(key) = access.next_key::<String>()? {
            match access.next_value_seed(EntrySeed)? {
                RawEntry::Content(content) => {
                    let file = decode_key(&key).and_then(|(kind, name)| {
                        validate_file_name(name).ok().map(|name| (kind, name))
                    });
                    match file {
                        Some((kind, name)) if !dir.contains(&name, EntryType::File(kind)) => {
                            dir.insert(name, Node::File(FileEntry::new(kind, content)));
                        }
                        _ => {
                            warn!(key = %key, "Keeping unreadable file entry as is");
                            dir.keep_foreign(key, Value::String(content));
                        }
                    }
                }
                RawEntry::Directory(child) => match validate_folder_name(&key) {
                    Ok(name) if !dir.contains(&name, EntryType::Directory) => {
                        dir.insert(name, Node::Directory(child));
                    }
                    _ => {
                        warn!(key = %key, "Keeping directory entry with unusable name as is");
                        let value = serde_json::to_value(&child).map_err(de::Error::custom)?;
                        dir.keep_foreign(key, value);
                    }
                },
                RawEntry::Other(value) => {
                    warn!(key = %key, "Keeping entry that is neither content nor directory as is");
                    dir.keep_foreign(key, value);
                }
            }
        }
        Ok(dir)
    }
}

impl<'de> Deserialize<'de> for Directory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DirectoryVisitor)
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCursor {
    Path(String),
    Segments(Vec<String>),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCursor::deserialize(deserializer).map_err(de::Error::custom)?;
        Ok(match raw {
            RawCursor::Path(path) => Cursor::parse(&path),
            RawCursor::Segments(segments) => Cursor::parse(&format!("/{}", segments.join("/"))),
            RawCursor::Other(_) => Cursor::root(),
        })
    }
}
