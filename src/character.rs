//! `character.txt` voicebank metadata parser.
//!
//! The file is INI-like. Keys before the first section header belong to the
//! implicit `Global` section; only `name`, `image`, `author` and `web` from that
//! section are kept.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::VoicebankMetadata;
use crate::parser::{tokenize_lines, LineOutcome, SkipReason};

const GLOBAL_SECTION: &str = "Global";

static SECTION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\s*(.*?)\s*\]$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IniLine {
    Section(String),
    Pair(String, String),
}

pub fn parse(text: &str, origin: &str) -> VoicebankMetadata {
    let mut meta = VoicebankMetadata::default();
    let mut in_global = true;

    let skipped_lines = tokenize_lines(text, origin, tokenize_line, |line| match line {
        IniLine::Section(name) => in_global = name.eq_ignore_ascii_case(GLOBAL_SECTION),
        IniLine::Pair(key, value) if in_global => {
            let value = (!value.is_empty()).then_some(value);
            match key.to_ascii_lowercase().as_str() {
                "name" => meta.name = value,
                "image" => meta.image = value,
                "author" => meta.author = value,
                "web" => meta.web = value,
                _ => {}
            }
        }
        IniLine::Pair(..) => {}
    });

    meta.skipped_lines = skipped_lines;
    meta
}

pub fn tokenize_line(line: &str) -> LineOutcome<IniLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return LineOutcome::Blank;
    }
    if let Some(caps) = SECTION_REGEX.captures(line) {
        return LineOutcome::Parsed(IniLine::Section(caps[1].to_string()));
    }
    match line.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => LineOutcome::Parsed(IniLine::Pair(
            key.trim().to_string(),
            value.trim().to_string(),
        )),
        _ => LineOutcome::Skipped(SkipReason::NotKeyValue),
    }
}
