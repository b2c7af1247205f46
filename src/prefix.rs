//! `prefix.map` pitch-prefix table parser.

use std::collections::BTreeMap;

use crate::models::PrefixTable;
use crate::parser::{tokenize_lines, LineOutcome, SkipReason};

pub fn parse(text: &str, origin: &str) -> PrefixTable {
    let mut map = BTreeMap::new();
    let skipped_lines = tokenize_lines(text, origin, tokenize_line, |(source, target)| {
        map.insert(source, target);
    });
    PrefixTable {
        map,
        skipped_lines,
        ..Default::default()
    }
}

/// Accepts lines with exactly two whitespace-separated tokens.
pub fn tokenize_line(line: &str) -> LineOutcome<(String, String)> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (None, _, _) => LineOutcome::Blank,
        (Some(source), Some(target), None) => {
            LineOutcome::Parsed((source.to_string(), target.to_string()))
        }
        _ => LineOutcome::Skipped(SkipReason::FieldCount),
    }
}
