use rustc_hash::FxHashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ImportError, ImportResult};
use crate::hash::HashedPath;
use crate::models::NormalizedRecord;

/// Output side of an import: resolves hashed paths under the import root and
/// writes records and copied files there.
pub struct OutputTree {
    root: PathBuf,
    /// Directories already created during this pass
    created: FxHashSet<PathBuf>,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: FxHashSet::default(),
        }
    }

    /// Relative location of `file_name` inside the hashed directory.
    pub fn relative(dir: &HashedPath, file_name: &str) -> String {
        if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", dir, file_name)
        }
    }

    /// Resolves a `/`-separated relative path under the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(relative.split('/').filter(|s| !s.is_empty()));
        path
    }

    fn ensure_parent(&mut self, path: &Path) -> ImportResult<()> {
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        if self.created.contains(parent) {
            return Ok(());
        }
        fs::create_dir_all(parent).map_err(|e| ImportError::io(parent, e))?;
        self.created.insert(parent.to_path_buf());
        Ok(())
    }

    /// Serializes `record` as pretty JSON into `dir`, replacing any previous record.
    /// Written to a temp file first and renamed into place.
    pub fn write_record<R: NormalizedRecord>(
        &mut self,
        dir: &HashedPath,
        record: &R,
    ) -> ImportResult<PathBuf> {
        let path = dir.to_path(&self.root).join(R::FILE_NAME);
        self.ensure_parent(&path)?;

        let tmp_path = path.with_extension("json.tmp");
        let file = File::create(&tmp_path).map_err(|e| ImportError::io(&tmp_path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer
            .flush()
            .map_err(|e| ImportError::io(&tmp_path, e))?;
        drop(writer);

        fs::rename(&tmp_path, &path).map_err(|e| ImportError::io(&path, e))?;
        debug!(path = ?path, "Record written");
        Ok(path)
    }

    /// Streams `reader` into `relative` under the root. Returns bytes copied.
    pub fn copy<R: Read + ?Sized>(&mut self, reader: &mut R, relative: &str) -> ImportResult<u64> {
        let path = self.resolve(relative);
        self.ensure_parent(&path)?;

        let file = File::create(&path).map_err(|e| ImportError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        let bytes = io::copy(reader, &mut writer).map_err(|e| ImportError::io(&path, e))?;
        writer.flush().map_err(|e| ImportError::io(&path, e))?;
        Ok(bytes)
    }
}
