//! Archive access.
//!
//! The importer only needs raw entry names up front and a byte stream per entry,
//! so container formats sit behind [`ArchiveSource`]. [`ZipSource`] adapts
//! `zip::ZipArchive`; names are returned undecoded because legacy archives rarely
//! set the UTF-8 flag.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{ImportError, ImportResult};

/// Name and kind of one archive entry, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub raw_name: Vec<u8>,
    pub is_dir: bool,
}

pub trait ArchiveSource {
    /// Headers of every entry, in archive order.
    fn headers(&mut self) -> ImportResult<Vec<EntryHeader>>;

    /// Opens the contents of the entry at `index` (as returned by `headers`).
    fn open(&mut self, index: usize) -> ImportResult<Box<dyn Read + '_>>;
}

pub struct ZipSource<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl ZipSource<BufReader<File>> {
    pub fn open_path(path: &Path) -> ImportResult<Self> {
        let file = File::open(path).map_err(|e| ImportError::io(path, e))?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R) -> ImportResult<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    fn headers(&mut self) -> ImportResult<Vec<EntryHeader>> {
        let mut headers = Vec::with_capacity(self.archive.len());
        for i in 0..self.archive.len() {
            let entry = self.archive.by_index_raw(i)?;
            headers.push(EntryHeader {
                raw_name: entry.name_raw().to_vec(),
                is_dir: entry.is_dir(),
            });
        }
        Ok(headers)
    }

    fn open(&mut self, index: usize) -> ImportResult<Box<dyn Read + '_>> {
        let entry = self.archive.by_index(index)?;
        Ok(Box::new(entry))
    }
}
