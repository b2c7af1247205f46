use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{OTO_RECORD, PREFIX_MAP_RECORD, VOICEBANK_RECORD};

/// One `oto.ini` line: timing parameters for a single alias of a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToneEntry {
    pub name: String,
    /// Wave file as referenced in the source table
    pub original_wav: String,
    /// Wave file relative to the record's directory after hashing
    pub wav: String,
    pub offset: i32,
    pub consonant: i32,
    pub cutoff: i32,
    pub preutter: i32,
    pub overlap: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ToneTable {
    pub original_file: String,
    pub normalized_file: String,
    pub entries: Vec<ToneEntry>,
    #[serde(skip)]
    pub skipped_lines: usize,
}

/// The `Global` section of `character.txt`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoicebankMetadata {
    pub original_file: String,
    pub normalized_file: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub web: Option<String>,
    #[serde(skip)]
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrefixTable {
    pub original_file: String,
    pub normalized_file: String,
    pub map: BTreeMap<String, String>,
    #[serde(skip)]
    pub skipped_lines: usize,
}

/// A parsed control file that is persisted as a normalized JSON record.
pub trait NormalizedRecord: Serialize {
    /// File name of the record inside its hashed directory
    const FILE_NAME: &'static str;

    fn set_origin(&mut self, original_file: String, normalized_file: String);

    fn skipped_lines(&self) -> usize;
}

macro_rules! normalized_record {
    ($ty:ty, $file:expr) => {
        impl NormalizedRecord for $ty {
            const FILE_NAME: &'static str = $file;

            fn set_origin(&mut self, original_file: String, normalized_file: String) {
                self.original_file = original_file;
                self.normalized_file = normalized_file;
            }

            fn skipped_lines(&self) -> usize {
                self.skipped_lines
            }
        }
    };
}

normalized_record!(ToneTable, OTO_RECORD);
normalized_record!(VoicebankMetadata, VOICEBANK_RECORD);
normalized_record!(PrefixTable, PREFIX_MAP_RECORD);
