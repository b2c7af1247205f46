//! Line tokenizer shared by the legacy format parsers.
//!
//! Legacy control files are parsed best-effort: every line either yields a value,
//! is blank, or is skipped with a reason. Skips are counted and logged at debug
//! level; they never fail the import.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `oto.ini` line without exactly one `=`
    Separator,
    /// wrong number of comma- or whitespace-separated fields
    FieldCount,
    /// `character.txt` line that is neither a section header nor `key=value`
    NotKeyValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome<T> {
    Parsed(T),
    Skipped(SkipReason),
    Blank,
}

/// Runs `tokenize` over every line of `text`, passing parsed values to `accept`.
/// Returns the number of skipped (non-blank, rejected) lines.
pub fn tokenize_lines<T, F, A>(text: &str, origin: &str, mut tokenize: F, mut accept: A) -> usize
where
    F: FnMut(&str) -> LineOutcome<T>,
    A: FnMut(T),
{
    let mut skipped = 0;
    for (lineno, line) in text.lines().enumerate() {
        match tokenize(line) {
            LineOutcome::Parsed(value) => accept(value),
            LineOutcome::Skipped(reason) => {
                skipped += 1;
                debug!(
                    file = origin,
                    line = lineno + 1,
                    reason = ?reason,
                    "Skipping malformed line"
                );
            }
            LineOutcome::Blank => {}
        }
    }
    skipped
}
