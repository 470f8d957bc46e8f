//! Current-directory cursor

use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Absolute path of the current directory, as directory names from the root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    segments: Vec<String>,
}

impl Cursor {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse an absolute `/a/b` path. Empty segments are skipped; `.` and
    /// `..` are resolved lexically.
    pub fn parse(path: &str) -> Self {
        Cursor::root().join(path)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve `path` against this cursor. Paths starting with `/` are
    /// absolute. `..` above the root stays at the root. Segments are NFC
    /// normalized like child names.
    pub fn join(&self, path: &str) -> Self {
        let mut segments = if path.starts_with('/') {
            Vec::new()
        } else {
            self.segments.clone()
        };
        for part in path.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name.nfc().collect()),
            }
        }
        Self { segments }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
