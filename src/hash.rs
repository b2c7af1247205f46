//! Content-addressed path hashing.
//!
//! Every segment of a source-relative path is replaced by the 8-digit lowercase
//! hex CRC-32 of its UTF-8 bytes. Hashing segment by segment keeps the tree shape:
//! the hashed parent is always a prefix of the hashed child, and the output is
//! ASCII with fixed-width segments no matter how long or exotic the input is.
//!
//! Collisions in the 32-bit space are possible and are not resolved.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::HASH_HEX_WIDTH;

/// A hashed relative path: a sequence of fixed-width hex segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HashedPath {
    segments: Vec<String>,
}

impl HashedPath {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Extends the path with one more hashed segment.
    pub fn join(&self, segment: &str) -> HashedPath {
        let mut segments = self.segments.clone();
        segments.push(hash_segment(segment));
        HashedPath { segments }
    }

    pub fn is_prefix_of(&self, other: &HashedPath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Resolves the hashed path under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(&self.segments);
        path
    }

    /// Relative form with `suffix` appended to the last segment, e.g. `1a2b3c4d/5e6f7a8b.wav`.
    pub fn with_suffix(&self, suffix: &str) -> String {
        format!("{}{}", self, suffix)
    }
}

impl fmt::Display for HashedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Hashes a single segment to `HASH_HEX_WIDTH` lowercase hex digits.
pub fn hash_segment(segment: &str) -> String {
    format!(
        "{:0width$x}",
        crc32fast::hash(segment.as_bytes()),
        width = HASH_HEX_WIDTH
    )
}

/// Hashes a directory-segment sequence. The empty sequence hashes to the empty path.
pub fn hash_segments<S: AsRef<str>>(segments: &[S]) -> HashedPath {
    HashedPath {
        segments: segments.iter().map(|s| hash_segment(s.as_ref())).collect(),
    }
}

/// Splits an archive key into path segments. Legacy archives mix `/` and `\`;
/// empty segments (leading, trailing or doubled separators) are dropped.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

/// Hashes a slash- or backslash-separated relative path.
pub fn hash_key(key: &str) -> HashedPath {
    hash_segments(&split_key(key))
}

/// Hashes a file reference by stripping its extension, hashing the stem path and
/// reattaching the extension: `sub/foo.wav` -> `xxxxxxxx/yyyyyyyy.wav`.
pub fn hash_file_ref(file_ref: &str) -> String {
    let mut segments = split_key(file_ref);
    let Some(last) = segments.pop() else {
        return String::new();
    };
    let (stem, ext) = match last.rfind('.') {
        Some(dot) if dot > 0 => last.split_at(dot),
        _ => (last, ""),
    };
    segments.push(stem);
    hash_segments(&segments).with_suffix(ext)
}
