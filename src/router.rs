//! Per-entry routing.
//!
//! An ordered list of rules decides what happens to each archive entry. The first
//! rule that matches wins; entries no rule claims are dropped.

use crate::config::{
    CHARACTER_FILE, HASHED_SUFFIXES, OTO_FILE, PREFIX_MAP_FILE, VERBATIM_SUFFIXES,
};
use crate::hash::{hash_segments, split_key, HashedPath};

/// A decoded archive key split into directory segments and base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey<'a> {
    pub key: &'a str,
    pub dirs: Vec<&'a str>,
    pub file_name: &'a str,
}

impl<'a> EntryKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        let mut dirs = split_key(key);
        let file_name = dirs.pop().unwrap_or("");
        EntryKey {
            key,
            dirs,
            file_name,
        }
    }

    /// Hashed form of the entry's directory.
    pub fn hashed_dir(&self) -> HashedPath {
        hash_segments(&self.dirs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFile {
    Oto,
    Character,
    PrefixMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Parse into a normalized record written into the hashed directory
    Record(ControlFile),
    /// Copy into the hashed directory under the original base name
    CopyVerbatim,
    /// Copy to the fully hashed path; the last `suffix_len` bytes of the name are kept
    CopyHashed { suffix_len: usize },
    Drop,
}

pub struct Rule {
    pub name: &'static str,
    pub matches: fn(&EntryKey) -> Option<Route>,
}

pub const RULES: &[Rule] = &[
    Rule {
        name: "control-file",
        matches: control_file,
    },
    Rule {
        name: "copy-verbatim",
        matches: verbatim,
    },
    Rule {
        name: "copy-hashed",
        matches: hashed,
    },
];

pub fn classify(entry: &EntryKey) -> Route {
    RULES
        .iter()
        .find_map(|rule| (rule.matches)(entry))
        .unwrap_or(Route::Drop)
}

fn control_file(entry: &EntryKey) -> Option<Route> {
    let control = match entry.file_name {
        OTO_FILE => ControlFile::Oto,
        CHARACTER_FILE => ControlFile::Character,
        PREFIX_MAP_FILE => ControlFile::PrefixMap,
        _ => return None,
    };
    Some(Route::Record(control))
}

fn verbatim(entry: &EntryKey) -> Option<Route> {
    matching_suffix(entry.file_name, VERBATIM_SUFFIXES).map(|_| Route::CopyVerbatim)
}

fn hashed(entry: &EntryKey) -> Option<Route> {
    matching_suffix(entry.file_name, HASHED_SUFFIXES)
        .map(|suffix| Route::CopyHashed {
            suffix_len: suffix.len(),
        })
}

/// ASCII case-insensitive suffix match. A name that is only the suffix does not match.
fn matching_suffix(name: &str, suffixes: &[&'static str]) -> Option<&'static str> {
    let bytes = name.as_bytes();
    suffixes.iter().copied().find(|suffix| {
        bytes.len() > suffix.len()
            && bytes[bytes.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
    })
}

/// Target of a fully hashed copy: `hash(dirs + stem)` with the original suffix.
pub fn hashed_file_target(entry: &EntryKey, suffix_len: usize) -> String {
    let split = entry.file_name.len() - suffix_len;
    let (stem, suffix) = entry.file_name.split_at(split);
    entry.hashed_dir().join(stem).with_suffix(suffix)
}
