use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Invalid import root or unknown encoding label; raised before any I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// No single encoding explains every entry name in the archive.
    #[error("Encoding detection failed: {0}")]
    Detection(String),
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ImportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ImportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
