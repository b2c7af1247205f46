//! `oto.ini` tone-offset table parser.
//!
//! Each line has the form `wavename=alias,offset,consonant,cutoff,preutter,overlap`.

use crate::hash::hash_file_ref;
use crate::models::{ToneEntry, ToneTable};
use crate::parser::{tokenize_lines, LineOutcome, SkipReason};

const FIELD_COUNT: usize = 6;

pub fn parse(text: &str, origin: &str) -> ToneTable {
    let mut entries = Vec::new();
    let skipped_lines = tokenize_lines(text, origin, tokenize_line, |entry| entries.push(entry));
    ToneTable {
        entries,
        skipped_lines,
        ..Default::default()
    }
}

pub fn tokenize_line(line: &str) -> LineOutcome<ToneEntry> {
    if line.trim().is_empty() {
        return LineOutcome::Blank;
    }

    let mut parts = line.split('=');
    let (wav, rhs) = match (parts.next(), parts.next(), parts.next()) {
        (Some(wav), Some(rhs), None) => (wav.trim(), rhs),
        _ => return LineOutcome::Skipped(SkipReason::Separator),
    };

    let fields: Vec<&str> = rhs.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return LineOutcome::Skipped(SkipReason::FieldCount);
    }

    LineOutcome::Parsed(ToneEntry {
        name: fields[0].trim().to_string(),
        original_wav: wav.to_string(),
        wav: hash_file_ref(wav),
        offset: parse_ms(fields[1]),
        consonant: parse_ms(fields[2]),
        cutoff: parse_ms(fields[3]),
        preutter: parse_ms(fields[4]),
        overlap: parse_ms(fields[5]),
    })
}

/// Parses a millisecond field as a signed 32-bit integer; anything else is 0.
fn parse_ms(field: &str) -> i32 {
    field.trim().parse().unwrap_or(0)
}
