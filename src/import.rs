//! Import orchestration.
//!
//! One import is a single forward pass: detect the filename encoding once, then
//! route every file entry of the archive (parse, copy, hashed copy or drop),
//! reporting progress after each one. There is no rollback; a failure leaves
//! whatever was already written under the import root.

use encoding_rs::Encoding;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::archive::{ArchiveSource, EntryHeader, ZipSource};
use crate::config::MAX_ROOT_LEN;
use crate::encoding::{self, decode_text, Detection};
use crate::error::{ImportError, ImportResult};
use crate::hash::HashedPath;
use crate::models::NormalizedRecord;
use crate::router::{self, hashed_file_target, ControlFile, EntryKey, Route};
use crate::stats::ImportStats;
use crate::writer::OutputTree;
use crate::{character, oto, prefix};

/// Runtime options, usually built from command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    pub root: PathBuf,
    /// Encoding label for entry names; detected when `None`
    pub archive_encoding: Option<String>,
    /// Encoding label for control-file contents; falls back to the name encoding
    pub text_encoding: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Importer {
    root: PathBuf,
    archive_encoding: Option<&'static Encoding>,
    text_encoding: Option<&'static Encoding>,
}

/// The import root must be ASCII and at most `MAX_ROOT_LEN` characters.
pub fn validate_root(root: &Path) -> ImportResult<()> {
    let Some(text) = root.to_str().filter(|s| s.is_ascii()) else {
        return Err(ImportError::Configuration(format!(
            "import root must be ASCII: {}",
            root.display()
        )));
    };
    if text.len() > MAX_ROOT_LEN {
        return Err(ImportError::Configuration(format!(
            "import root is {} characters long, limit is {}: {}",
            text.len(),
            MAX_ROOT_LEN,
            text
        )));
    }
    Ok(())
}

impl Importer {
    pub fn new(root: impl Into<PathBuf>) -> ImportResult<Self> {
        let root = root.into();
        validate_root(&root)?;
        Ok(Self {
            root,
            archive_encoding: None,
            text_encoding: None,
        })
    }

    pub fn from_config(config: &ImportConfig) -> ImportResult<Self> {
        let mut importer = Self::new(config.root.clone())?;
        if let Some(label) = &config.archive_encoding {
            importer.archive_encoding = Some(encoding::encoding_for_label(label)?);
        }
        if let Some(label) = &config.text_encoding {
            importer.text_encoding = Some(encoding::encoding_for_label(label)?);
        }
        Ok(importer)
    }

    pub fn with_archive_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.archive_encoding = Some(encoding);
        self
    }

    pub fn with_text_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.text_encoding = Some(encoding);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Chooses the filename encoding: the configured one (checked against every
    /// name) or a statistical guess.
    pub fn detect(&self, headers: &[EntryHeader]) -> ImportResult<Detection> {
        let names: Vec<&[u8]> = headers.iter().map(|h| h.raw_name.as_slice()).collect();
        match self.archive_encoding {
            Some(encoding) => {
                encoding::verify(&names, encoding)?;
                Ok(Detection {
                    encoding,
                    confident: true,
                })
            }
            None => encoding::detect(&names),
        }
    }

    /// Opens the zip archive at `path` and imports it.
    pub fn install_zip<F>(&self, path: &Path, progress: F) -> ImportResult<ImportStats>
    where
        F: FnMut(u32, &str),
    {
        info!(archive = ?path, root = ?self.root, "Installing voicebank");
        let mut source = ZipSource::open_path(path)?;
        self.run(&mut source, progress)
    }

    /// Imports every entry of `source`. `progress` receives the integer percentage
    /// and the decoded entry key once per file entry.
    pub fn run<A, F>(&self, source: &mut A, mut progress: F) -> ImportResult<ImportStats>
    where
        A: ArchiveSource + ?Sized,
        F: FnMut(u32, &str),
    {
        let start = Instant::now();
        let headers = source.headers()?;

        let detection = self.detect(&headers)?;
        let text_encoding = self.text_encoding.unwrap_or(detection.encoding);
        info!(
            entries = headers.len(),
            names = detection.name(),
            confident = detection.confident,
            text = text_encoding.name(),
            "Archive encoding resolved"
        );

        let files = headers.iter().filter(|h| !h.is_dir).count();
        let mut stats = ImportStats::new(files as u64);
        let mut tree = OutputTree::new(&self.root);

        for (index, header) in headers.iter().enumerate() {
            if header.is_dir {
                continue;
            }
            let key = detection.decode_name(&header.raw_name).ok_or_else(|| {
                ImportError::Detection(format!(
                    "entry name {:?} is not valid {}",
                    String::from_utf8_lossy(&header.raw_name),
                    detection.name()
                ))
            })?;

            import_entry(source, index, &key, text_encoding, &mut tree, &mut stats)?;

            let percent = stats.advance();
            progress(percent, key.as_ref());
        }

        info!(
            duration_secs = start.elapsed().as_secs_f64(),
            records = stats.records_written,
            copied = stats.files_copied,
            hashed = stats.files_hashed,
            dropped = stats.entries_dropped,
            skipped_lines = stats.lines_skipped,
            "Import complete"
        );
        Ok(stats)
    }
}

fn import_entry<A: ArchiveSource + ?Sized>(
    source: &mut A,
    index: usize,
    key: &str,
    text_encoding: &'static Encoding,
    tree: &mut OutputTree,
    stats: &mut ImportStats,
) -> ImportResult<()> {
    let entry = EntryKey::parse(key);
    match router::classify(&entry) {
        Route::Record(control) => {
            let mut bytes = Vec::new();
            source
                .open(index)?
                .read_to_end(&mut bytes)
                .map_err(|e| ImportError::io(key, e))?;
            let text = decode_text(&bytes, text_encoding, key);
            let dir = entry.hashed_dir();
            match control {
                ControlFile::Oto => write_record(tree, &dir, key, oto::parse(&text, key), stats),
                ControlFile::Character => {
                    write_record(tree, &dir, key, character::parse(&text, key), stats)
                }
                ControlFile::PrefixMap => {
                    write_record(tree, &dir, key, prefix::parse(&text, key), stats)
                }
            }
        }
        Route::CopyVerbatim => {
            let relative = OutputTree::relative(&entry.hashed_dir(), entry.file_name);
            let mut reader = source.open(index)?;
            let bytes = tree.copy(&mut *reader, &relative)?;
            debug!(entry = key, target = %relative, "Copied");
            stats.inc_copied(bytes);
            Ok(())
        }
        Route::CopyHashed { suffix_len } => {
            let relative = hashed_file_target(&entry, suffix_len);
            let mut reader = source.open(index)?;
            let bytes = tree.copy(&mut *reader, &relative)?;
            debug!(entry = key, target = %relative, "Copied under hashed name");
            stats.inc_hashed(bytes);
            Ok(())
        }
        Route::Drop => {
            debug!(entry = key, "No rule matched, dropping entry");
            stats.inc_dropped();
            Ok(())
        }
    }
}

fn write_record<R: NormalizedRecord>(
    tree: &mut OutputTree,
    dir: &HashedPath,
    key: &str,
    mut record: R,
    stats: &mut ImportStats,
) -> ImportResult<()> {
    record.set_origin(key.to_string(), OutputTree::relative(dir, R::FILE_NAME));
    tree.write_record(dir, &record)?;
    let skipped = record.skipped_lines();
    if skipped > 0 {
        info!(file = key, skipped = skipped, "Skipped malformed lines");
    }
    stats.inc_records(skipped);
    Ok(())
}
